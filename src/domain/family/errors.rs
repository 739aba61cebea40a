//! Family Context - Errors

use thiserror::Error;

use super::FamilyId;

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("Family not found: {0}")]
    NotFound(FamilyId),

    #[error("Invalid family name: {0}")]
    InvalidName(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}
