//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{MailerError, RepositoryError};
use crate::domain::family::FamilyError;
use crate::domain::story::StoryError;
use crate::domain::validation::{summarize, FieldError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 字段校验失败，保存被阻止
    #[error("Validation failed: {}", summarize(.0))]
    Invalid(Vec<FieldError>),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 无权操作
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 资源冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建无权操作错误
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<MailerError> for ApplicationError {
    fn from(err: MailerError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<StoryError> for ApplicationError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::NotFound(id) => Self::not_found("Story", *id.as_uuid()),
            StoryError::Invalid(errors) => Self::Invalid(errors),
        }
    }
}

impl From<FamilyError> for ApplicationError {
    fn from(err: FamilyError) -> Self {
        match err {
            FamilyError::NotFound(id) => Self::not_found("Family", *id.as_uuid()),
            other => Self::ValidationError(other.to_string()),
        }
    }
}
