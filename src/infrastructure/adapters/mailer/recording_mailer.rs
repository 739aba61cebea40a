//! Recording Mailer - 用于测试的邮件实现
//!
//! 把所有邮件保存在内存里，供断言使用

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{Mail, MailerError, MailerPort};

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已发送的邮件（按发送顺序）
    pub fn sent(&self) -> Vec<Mail> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[async_trait]
impl MailerPort for RecordingMailer {
    async fn deliver(&self, mail: Mail) -> Result<(), MailerError> {
        tracing::debug!(to = %mail.to, subject = %mail.subject, "Mail recorded");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let mailer = RecordingMailer::new();
        for to in ["a@example.com", "b@example.com"] {
            mailer
                .deliver(Mail {
                    to: to.to_string(),
                    subject: "Hi".to_string(),
                    body: String::new(),
                })
                .await
                .unwrap();
        }

        let to: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(to, vec!["a@example.com", "b@example.com"]);

        mailer.clear();
        assert!(mailer.sent().is_empty());
    }
}
