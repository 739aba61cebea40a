//! 字段级校验错误
//!
//! 聚合根保存前的校验结果，按字段收集后一次性返回给调用方

use serde::{Deserialize, Serialize};

use super::story::DateRangeError;

/// 必填字段为空时的提示
pub const BLANK_MESSAGE: &str = "can't be blank";

/// 挂在某个字段上的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self::new(field, BLANK_MESSAGE)
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl From<DateRangeError> for FieldError {
    fn from(err: DateRangeError) -> Self {
        Self::new(err.field().as_str(), err.to_string())
    }
}

/// 把多个错误拼成一行，用于日志和错误消息
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
