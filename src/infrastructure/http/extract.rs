//! 请求提取器
//!
//! 调用者身份由上游网关写入 `X-User-Id` 头，这里只负责识别，不做登录

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::application::UserRecord;

pub const USER_ID_HEADER: &str = "x-user-id";

/// 当前调用者
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing X-User-Id header".to_string()))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::Unauthorized(format!("invalid user id: {}", raw)))?;

        let user = state
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(format!("unknown user: {}", user_id)))?;

        Ok(CurrentUser(user))
    }
}
