//! Family Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FamilyError, FamilyId, KinshipRole};

/// Family 聚合根
///
/// 不变量:
/// - 名称不能为空
/// - 个人空间（personal_access）只接受访客身份的成员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    id: FamilyId,
    name: String,
    personal_access: bool,
    created_at: DateTime<Utc>,
}

impl Family {
    /// 创建新家庭
    pub fn new(name: impl Into<String>, personal_access: bool) -> Result<Self, FamilyError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(FamilyError::InvalidName("name can't be blank".to_string()));
        }
        if name.chars().count() > 100 {
            return Err(FamilyError::InvalidName(
                "name is too long (maximum is 100 characters)".to_string(),
            ));
        }
        Ok(Self {
            id: FamilyId::new(),
            name,
            personal_access,
            created_at: Utc::now(),
        })
    }

    /// 从存储恢复
    pub fn restore(
        id: FamilyId,
        name: String,
        personal_access: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            personal_access,
            created_at,
        }
    }

    /// 受邀者最终获得的角色
    pub fn invitation_role(&self, requested: Option<KinshipRole>) -> Option<KinshipRole> {
        if self.personal_access {
            Some(KinshipRole::Guest)
        } else {
            requested
        }
    }

    // Getters
    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn personal_access(&self) -> bool {
        self.personal_access
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
