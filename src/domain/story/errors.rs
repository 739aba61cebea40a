//! Story Context - Errors

use thiserror::Error;

use super::StoryId;
use crate::domain::validation::{summarize, FieldError};

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Story not found: {0}")]
    NotFound(StoryId),

    #[error("Story is invalid: {}", summarize(.0))]
    Invalid(Vec<FieldError>),
}
