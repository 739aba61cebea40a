//! Mailer Port - 邮件发送抽象
//!
//! 邮件投递由外部服务完成，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::family::{Family, Invitation, KinshipRole};

/// 邮件错误
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),
}

/// 待发送的邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    /// 家庭邀请邮件
    pub fn invitation(invitation: &Invitation, family: &Family, sender_name: &str) -> Self {
        let mut body = format!(
            "{} invited you to join {} and share family stories.",
            sender_name,
            family.name()
        );
        if !invitation.message().trim().is_empty() {
            body.push_str("\n\n");
            body.push_str(invitation.message());
        }
        Self {
            to: invitation.email().to_string(),
            subject: format!("{} invited you to join {}", sender_name, family.name()),
            body,
        }
    }

    /// 角色变更通知
    pub fn role_changed(to: impl Into<String>, family: &Family, role: KinshipRole) -> Self {
        Self {
            to: to.into(),
            subject: format!("Your Role Changed in {}", family.name()),
            body: format!("Your role in {} is now {}.", family.name(), role),
        }
    }
}

/// Mailer Port
#[async_trait]
pub trait MailerPort: Send + Sync {
    /// 投递一封邮件
    async fn deliver(&self, mail: Mail) -> Result<(), MailerError>;
}
