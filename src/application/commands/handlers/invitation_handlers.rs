//! Invitation Command Handlers
//!
//! 批量邀请按受邀者逐个处理，结果分成 existing / valid / invalid 三组返回

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_membership;
use crate::application::commands::{CreateInvitations, InviteeParams, ResendInvitations};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    FamilyRepositoryPort, InvitationRepositoryPort, Mail, MailerPort, UserRecord,
    UserRepositoryPort,
};
use crate::domain::family::{Email, Family, FamilyId, Invitation, KinshipRole};

/// 批量邀请结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvitationOutcomes {
    /// 已是家庭成员
    pub existing: Vec<String>,
    /// 邀请已保存并发出
    pub valid: Vec<String>,
    /// 校验失败未保存
    pub invalid: Vec<String>,
}

/// 重发结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResendOutcome {
    pub resent: Vec<String>,
}

async fn load_family(
    repo: &dyn FamilyRepositoryPort,
    family_id: Uuid,
) -> Result<Family, ApplicationError> {
    repo.find_by_id(FamilyId::from_uuid(family_id))
        .await?
        .ok_or_else(|| ApplicationError::not_found("Family", family_id))
}

async fn load_user(
    repo: &dyn UserRepositoryPort,
    user_id: Uuid,
) -> Result<UserRecord, ApplicationError> {
    repo.find_by_id(user_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("User", user_id))
}

// ============================================================================
// CreateInvitations
// ============================================================================

/// CreateInvitations Handler
pub struct CreateInvitationsHandler {
    family_repo: Arc<dyn FamilyRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
    invitation_repo: Arc<dyn InvitationRepositoryPort>,
    mailer: Arc<dyn MailerPort>,
}

impl CreateInvitationsHandler {
    pub fn new(
        family_repo: Arc<dyn FamilyRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        invitation_repo: Arc<dyn InvitationRepositoryPort>,
        mailer: Arc<dyn MailerPort>,
    ) -> Self {
        Self {
            family_repo,
            user_repo,
            invitation_repo,
            mailer,
        }
    }

    pub async fn handle(
        &self,
        command: CreateInvitations,
    ) -> Result<InvitationOutcomes, ApplicationError> {
        let family = load_family(self.family_repo.as_ref(), command.family_id).await?;
        require_membership(self.family_repo.as_ref(), family.id(), command.sender_id).await?;
        let sender = load_user(self.user_repo.as_ref(), command.sender_id).await?;

        let message = command.message.unwrap_or_default();
        let mut outcomes = InvitationOutcomes::default();

        for params in &command.users {
            self.invite(&family, &sender, params, &message, &mut outcomes)
                .await?;
        }

        tracing::info!(
            family_id = %family.id(),
            sender_id = %sender.id,
            existing = outcomes.existing.len(),
            valid = outcomes.valid.len(),
            invalid = outcomes.invalid.len(),
            "Invitations processed"
        );

        Ok(outcomes)
    }

    async fn invite(
        &self,
        family: &Family,
        sender: &UserRecord,
        params: &InviteeParams,
        message: &str,
        outcomes: &mut InvitationOutcomes,
    ) -> Result<(), ApplicationError> {
        let recipient = self.find_recipient(params).await?;

        if let Some(recipient) = &recipient {
            if self
                .family_repo
                .find_membership(family.id(), recipient.id)
                .await?
                .is_some()
            {
                outcomes.existing.push(recipient.email.clone());
                return Ok(());
            }
        }

        let recipient_id = recipient.as_ref().map(|r| r.id);
        let existing_invitation = match recipient_id {
            Some(id) => self.invitation_repo.find_by_recipient(family.id(), id).await?,
            None => None,
        };
        let mut invitation =
            existing_invitation.unwrap_or_else(|| Invitation::new(family.id(), recipient_id));

        let email = match &recipient {
            Some(recipient) => recipient.email.clone(),
            None => params
                .email
                .as_deref()
                .map(|e| e.trim().to_lowercase())
                .unwrap_or_default(),
        };
        let requested = params.role.as_deref().and_then(KinshipRole::from_str);
        invitation.assign(
            email.clone(),
            family.invitation_role(requested),
            message,
            sender.id,
        );

        let errors = invitation.validate();
        if !errors.is_empty() {
            tracing::debug!(
                family_id = %family.id(),
                email = %email,
                errors = ?errors,
                "Invitation rejected"
            );
            outcomes.invalid.push(email);
            return Ok(());
        }

        self.invitation_repo.save(&invitation).await?;
        self.mailer
            .deliver(Mail::invitation(&invitation, family, &sender.name))
            .await?;

        tracing::info!(
            invitation_id = %invitation.id(),
            family_id = %family.id(),
            email = %email,
            "Invitation sent"
        );

        outcomes.valid.push(email);
        Ok(())
    }

    /// 优先按 id 查找，其次按邮箱
    async fn find_recipient(
        &self,
        params: &InviteeParams,
    ) -> Result<Option<UserRecord>, ApplicationError> {
        if let Some(id) = params.id {
            return Ok(self.user_repo.find_by_id(id).await?);
        }
        match params.email.as_deref().map(Email::parse) {
            Some(Ok(email)) => Ok(self.user_repo.find_by_email(email.as_str()).await?),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// ResendInvitations
// ============================================================================

/// ResendInvitations Handler - 已接受的邀请不再重发
pub struct ResendInvitationsHandler {
    family_repo: Arc<dyn FamilyRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
    invitation_repo: Arc<dyn InvitationRepositoryPort>,
    mailer: Arc<dyn MailerPort>,
}

impl ResendInvitationsHandler {
    pub fn new(
        family_repo: Arc<dyn FamilyRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        invitation_repo: Arc<dyn InvitationRepositoryPort>,
        mailer: Arc<dyn MailerPort>,
    ) -> Self {
        Self {
            family_repo,
            user_repo,
            invitation_repo,
            mailer,
        }
    }

    pub async fn handle(&self, command: ResendInvitations) -> Result<ResendOutcome, ApplicationError> {
        let family = load_family(self.family_repo.as_ref(), command.family_id).await?;
        require_membership(self.family_repo.as_ref(), family.id(), command.user_id).await?;

        let invitations = self
            .invitation_repo
            .find_by_ids(family.id(), &command.ids)
            .await?;

        let mut outcome = ResendOutcome::default();
        for invitation in invitations.iter().filter(|i| !i.is_accepted()) {
            let sender_id = invitation.sender_id().unwrap_or(command.user_id);
            let sender = load_user(self.user_repo.as_ref(), sender_id).await?;

            self.mailer
                .deliver(Mail::invitation(invitation, &family, &sender.name))
                .await?;
            outcome.resent.push(invitation.email().to_string());
        }

        tracing::info!(
            family_id = %family.id(),
            requested = command.ids.len(),
            resent = outcome.resent.len(),
            "Invitations resent"
        );

        Ok(outcome)
    }
}
