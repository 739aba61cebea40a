//! Family Context - Value Objects

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FamilyError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// 家庭唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyId(Uuid);

impl FamilyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FamilyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 家庭成员角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinshipRole {
    Admin,
    CoAdmin,
    Member,
    Guest,
}

impl KinshipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            KinshipRole::Admin => "admin",
            KinshipRole::CoAdmin => "co_admin",
            KinshipRole::Member => "member",
            KinshipRole::Guest => "guest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(KinshipRole::Admin),
            "co_admin" => Some(KinshipRole::CoAdmin),
            "member" => Some(KinshipRole::Member),
            "guest" => Some(KinshipRole::Guest),
            _ => None,
        }
    }

    /// 是否可以通过邀请或改角色授予（admin 只属于家庭创建者）
    pub fn is_assignable(&self) -> bool {
        *self != KinshipRole::Admin
    }

    /// 是否可以管理成员角色
    pub fn can_manage_members(&self) -> bool {
        matches!(self, KinshipRole::Admin | KinshipRole::CoAdmin)
    }
}

impl std::fmt::Display for KinshipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 邮箱地址（去空白、转小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn parse(email: impl AsRef<str>) -> Result<Self, FamilyError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if !EMAIL_RE.is_match(&normalized) {
            return Err(FamilyError::InvalidEmail(email.as_ref().to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
