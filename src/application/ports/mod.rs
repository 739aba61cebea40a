//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod mailer;
mod repositories;

pub use mailer::{Mail, MailerError, MailerPort};
pub use repositories::{
    FamilyRepositoryPort, InvitationRepositoryPort, RepositoryError, StoryRepositoryPort,
    StoryScope, UserRecord, UserRepositoryPort,
};
