//! Log Mailer - 只写日志，不实际投递
//!
//! 默认的邮件实现，本地开发时使用

use async_trait::async_trait;

use crate::application::ports::{Mail, MailerError, MailerPort};

pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl MailerPort for LogMailer {
    async fn deliver(&self, mail: Mail) -> Result<(), MailerError> {
        tracing::info!(
            from = %self.from,
            to = %mail.to,
            subject = %mail.subject,
            body_len = mail.body.len(),
            "Mail logged (not delivered)"
        );
        Ok(())
    }
}
