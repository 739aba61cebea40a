//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Story Context: 故事、段落、发布与故事日期
//! - Family Context: 家庭、成员关系与邀请

pub mod family;
pub mod story;

pub mod sanitizer;
pub mod validation;

pub use sanitizer::sanitize;
pub use validation::FieldError;
