//! HTTP Mailer - 调用外部事务邮件服务
//!
//! 外部邮件 API:
//! POST {api_url}/messages
//! Request: {"from": "...", "to": "...", "subject": "...", "text": "..."}  (JSON)
//! Authorization: Bearer {api_key}（可选）

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{Mail, MailerError, MailerPort};

/// 邮件请求体 (JSON)
#[derive(Debug, Serialize)]
struct MailHttpRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// HTTP Mailer 配置
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// 邮件服务基础 URL
    pub api_url: String,
    /// API 密钥
    pub api_key: Option<String>,
    /// 发件地址
    pub from: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpMailerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8025".to_string(),
            api_key: None,
            from: "no-reply@famstory.local".to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpMailerConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Mailer
pub struct HttpMailer {
    client: Client,
    config: HttpMailerConfig,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MailerError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MailerPort for HttpMailer {
    async fn deliver(&self, mail: Mail) -> Result<(), MailerError> {
        let body = MailHttpRequest {
            from: &self.config.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        };

        tracing::debug!(
            url = %self.messages_url(),
            to = %mail.to,
            subject = %mail.subject,
            "Sending mail request"
        );

        let mut request = self.client.post(self.messages_url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MailerError::Timeout
            } else if e.is_connect() {
                MailerError::NetworkError(format!("Cannot connect to mail service: {}", e))
            } else {
                MailerError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MailerError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        tracing::info!(to = %mail.to, subject = %mail.subject, "Mail delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpMailerConfig::default();
        assert_eq!(config.from, "no-reply@famstory.local");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpMailerConfig::new("https://mail.example.com/v1/")
            .with_api_key("secret")
            .with_from("stories@example.com")
            .with_timeout(5);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.from, "stories@example.com");
        assert_eq!(config.timeout_secs, 5);

        let mailer = HttpMailer::new(config).unwrap();
        assert_eq!(mailer.messages_url(), "https://mail.example.com/v1/messages");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // 端口 9 (discard) 在测试环境中不会有 HTTP 服务
        let mailer = HttpMailer::new(HttpMailerConfig::new("http://127.0.0.1:9").with_timeout(2))
            .unwrap();
        let result = mailer
            .deliver(Mail {
                to: "bob@example.com".to_string(),
                subject: "Hello".to_string(),
                body: "Hi".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(MailerError::NetworkError(_)) | Err(MailerError::Timeout)
        ));
    }
}
