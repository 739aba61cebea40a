//! famstory - 家庭故事分享服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 故事、段落、发布，故事日期的校验与文本生成
//! - Family Context: 家庭、成员角色与邀请
//!
//! 应用层 (application/):
//! - Ports: Repository 与 Mailer 端口
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful JSON API
//! - Persistence: SQLite 存储
//! - Adapters: 邮件发送

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{load_config, AppConfig};
