//! User HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateUser, UserResponse};
use crate::infrastructure::http::dto::{ApiResponse, CreateUserRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 注册用户（不需要调用者身份）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .create_user_handler
        .handle(CreateUser {
            name: req.name,
            email: req.email,
        })
        .await?;
    Ok(Json(ApiResponse::success(user)))
}
