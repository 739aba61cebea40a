//! Mailer Adapter - 邮件投递实现

mod http_mailer;
mod log_mailer;
mod recording_mailer;

pub use http_mailer::{HttpMailer, HttpMailerConfig};
pub use log_mailer::LogMailer;
pub use recording_mailer::RecordingMailer;
