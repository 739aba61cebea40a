//! Family Command Handlers - 家庭与成员角色

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_membership;
use crate::application::commands::{CreateFamily, UpdateKinshipRole};
use crate::application::error::ApplicationError;
use crate::application::ports::{FamilyRepositoryPort, Mail, MailerPort, UserRepositoryPort};
use crate::domain::family::{Family, Kinship, KinshipRole};
use crate::domain::sanitize;
use crate::domain::validation::FieldError;

/// 成员关系响应
#[derive(Debug, Clone, Serialize)]
pub struct KinshipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub role: KinshipRole,
}

impl From<&Kinship> for KinshipResponse {
    fn from(kinship: &Kinship) -> Self {
        Self {
            id: kinship.id(),
            user_id: kinship.user_id(),
            family_id: *kinship.family_id().as_uuid(),
            role: kinship.role(),
        }
    }
}

/// 家庭响应
#[derive(Debug, Clone, Serialize)]
pub struct FamilyResponse {
    pub id: Uuid,
    pub name: String,
    pub personal_access: bool,
    pub kinship: KinshipResponse,
    pub created_at: String,
}

// ============================================================================
// CreateFamily
// ============================================================================

/// CreateFamily Handler - 创建者成为 admin
pub struct CreateFamilyHandler {
    family_repo: Arc<dyn FamilyRepositoryPort>,
}

impl CreateFamilyHandler {
    pub fn new(family_repo: Arc<dyn FamilyRepositoryPort>) -> Self {
        Self { family_repo }
    }

    pub async fn handle(&self, command: CreateFamily) -> Result<FamilyResponse, ApplicationError> {
        let family = Family::new(sanitize(&command.name), command.personal_access)?;
        let kinship = Kinship::new(command.user_id, family.id(), KinshipRole::Admin);

        self.family_repo.save(&family).await?;
        self.family_repo.save_kinship(&kinship).await?;

        tracing::info!(
            family_id = %family.id(),
            user_id = %command.user_id,
            personal_access = family.personal_access(),
            "Family created"
        );

        Ok(FamilyResponse {
            id: *family.id().as_uuid(),
            name: family.name().to_string(),
            personal_access: family.personal_access(),
            kinship: KinshipResponse::from(&kinship),
            created_at: family.created_at().to_rfc3339(),
        })
    }
}

// ============================================================================
// UpdateKinshipRole
// ============================================================================

/// UpdateKinshipRole Handler - admin / co_admin 修改成员角色并通知对方
pub struct UpdateKinshipRoleHandler {
    family_repo: Arc<dyn FamilyRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
    mailer: Arc<dyn MailerPort>,
}

impl UpdateKinshipRoleHandler {
    pub fn new(
        family_repo: Arc<dyn FamilyRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        mailer: Arc<dyn MailerPort>,
    ) -> Self {
        Self {
            family_repo,
            user_repo,
            mailer,
        }
    }

    pub async fn handle(
        &self,
        command: UpdateKinshipRole,
    ) -> Result<KinshipResponse, ApplicationError> {
        let mut kinship = self
            .family_repo
            .find_kinship(command.kinship_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Kinship", command.kinship_id))?;

        let family = self
            .family_repo
            .find_by_id(kinship.family_id())
            .await?
            .ok_or_else(|| ApplicationError::not_found("Family", *kinship.family_id().as_uuid()))?;

        let actor = require_membership(self.family_repo.as_ref(), family.id(), command.user_id).await?;
        if !actor.role().can_manage_members() {
            return Err(ApplicationError::permission_denied(format!(
                "{} cannot change roles in family {}",
                actor.role(),
                family.id()
            )));
        }

        let role = KinshipRole::from_str(command.role.trim())
            .filter(KinshipRole::is_assignable)
            .ok_or_else(|| {
                ApplicationError::Invalid(vec![FieldError::new(
                    "role",
                    "is not included in the list",
                )])
            })?;

        kinship.change_role(role)?;
        self.family_repo.save_kinship(&kinship).await?;

        let member = self
            .user_repo
            .find_by_id(kinship.user_id())
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", kinship.user_id()))?;
        self.mailer
            .deliver(Mail::role_changed(member.email, &family, role))
            .await?;

        tracing::info!(
            kinship_id = %kinship.id(),
            family_id = %family.id(),
            role = %role,
            changed_by = %command.user_id,
            "Kinship role changed"
        );

        Ok(KinshipResponse::from(&kinship))
    }
}
