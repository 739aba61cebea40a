//! Family Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Email, FamilyError, FamilyId, KinshipRole};
use crate::domain::validation::FieldError;

/// 成员关系：用户在某个家庭中的身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kinship {
    id: Uuid,
    user_id: Uuid,
    family_id: FamilyId,
    role: KinshipRole,
}

impl Kinship {
    pub fn new(user_id: Uuid, family_id: FamilyId, role: KinshipRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            family_id,
            role,
        }
    }

    pub fn restore(id: Uuid, user_id: Uuid, family_id: FamilyId, role: KinshipRole) -> Self {
        Self {
            id,
            user_id,
            family_id,
            role,
        }
    }

    /// 修改角色，admin 不可授予
    pub fn change_role(&mut self, role: KinshipRole) -> Result<(), FamilyError> {
        if !role.is_assignable() {
            return Err(FamilyError::InvalidRole(role.to_string()));
        }
        self.role = role;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn family_id(&self) -> FamilyId {
        self.family_id
    }

    pub fn role(&self) -> KinshipRole {
        self.role
    }
}

/// 家庭邀请
///
/// 同一家庭对同一已注册用户只保留一条邀请，重新邀请时复用并重置状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: Uuid,
    family_id: FamilyId,
    recipient_id: Option<Uuid>,
    sender_id: Option<Uuid>,
    email: String,
    role: Option<KinshipRole>,
    message: String,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(family_id: FamilyId, recipient_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            family_id,
            recipient_id,
            sender_id: None,
            email: String::new(),
            role: None,
            message: String::new(),
            accepted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        family_id: FamilyId,
        recipient_id: Option<Uuid>,
        sender_id: Option<Uuid>,
        email: String,
        role: Option<KinshipRole>,
        message: String,
        accepted_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            family_id,
            recipient_id,
            sender_id,
            email,
            role,
            message,
            accepted_at,
            created_at,
            updated_at,
        }
    }

    /// 填写（或重置）邀请内容，接受状态清空
    pub fn assign(
        &mut self,
        email: impl Into<String>,
        role: Option<KinshipRole>,
        message: impl Into<String>,
        sender_id: Uuid,
    ) {
        self.email = email.into();
        self.role = role;
        self.message = message.into();
        self.sender_id = Some(sender_id);
        self.accepted_at = None;
        self.updated_at = Utc::now();
    }

    /// 保存前校验
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.email.trim().is_empty() {
            errors.push(FieldError::blank("email"));
        } else if Email::parse(&self.email).is_err() {
            errors.push(FieldError::new("email", "is invalid"));
        }

        match self.role {
            None => errors.push(FieldError::blank("role")),
            Some(role) if !role.is_assignable() => {
                errors.push(FieldError::new("role", "is not included in the list"))
            }
            Some(_) => {}
        }

        if self.sender_id.is_none() {
            errors.push(FieldError::blank("sender"));
        }

        errors
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn family_id(&self) -> FamilyId {
        self.family_id
    }

    pub fn recipient_id(&self) -> Option<Uuid> {
        self.recipient_id
    }

    pub fn sender_id(&self) -> Option<Uuid> {
        self.sender_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Option<KinshipRole> {
        self.role
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
