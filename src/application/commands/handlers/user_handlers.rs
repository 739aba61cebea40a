//! User Command Handlers

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::CreateUser;
use crate::application::error::ApplicationError;
use crate::application::ports::{UserRecord, UserRepositoryPort};
use crate::domain::family::Email;
use crate::domain::sanitize;
use crate::domain::validation::FieldError;

/// 用户响应
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// CreateUser Handler
pub struct CreateUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl CreateUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: CreateUser) -> Result<UserResponse, ApplicationError> {
        let name = sanitize(&command.name);
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(FieldError::blank("name"));
        }
        let email = if command.email.trim().is_empty() {
            errors.push(FieldError::blank("email"));
            None
        } else {
            match Email::parse(&command.email) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.push(FieldError::new("email", "is invalid"));
                    None
                }
            }
        };

        let Some(email) = email.filter(|_| errors.is_empty()) else {
            return Err(ApplicationError::Invalid(errors));
        };

        if self.user_repo.find_by_email(email.as_str()).await?.is_some() {
            return Err(ApplicationError::Invalid(vec![FieldError::new(
                "email",
                "has already been taken",
            )]));
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            name,
            email: email.as_str().to_string(),
            created_at: Utc::now(),
        };
        self.user_repo.save(&user).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User created");

        Ok(UserResponse::from(&user))
    }
}
