//! Family HTTP Handlers - 家庭、成员角色与邀请

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateFamily, CreateInvitations, FamilyResponse, InvitationOutcomes, KinshipResponse,
    ResendInvitations, ResendOutcome, UpdateKinshipRole,
};
use crate::infrastructure::http::dto::{
    ApiResponse, CreateFamilyRequest, CreateInvitationsRequest, ResendInvitationsRequest,
    UpdateKinshipRoleRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::CurrentUser;
use crate::infrastructure::http::state::AppState;

/// 创建家庭
pub async fn create_family(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreateFamilyRequest>,
) -> Result<Json<ApiResponse<FamilyResponse>>, ApiError> {
    let family = state
        .create_family_handler
        .handle(CreateFamily {
            user_id: user.id(),
            name: req.name,
            personal_access: req.personal_access,
        })
        .await?;
    Ok(Json(ApiResponse::success(family)))
}

/// 修改成员角色
pub async fn update_kinship_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(kinship_id): Path<Uuid>,
    Json(req): Json<UpdateKinshipRoleRequest>,
) -> Result<Json<ApiResponse<KinshipResponse>>, ApiError> {
    let kinship = state
        .update_kinship_role_handler
        .handle(UpdateKinshipRole {
            kinship_id,
            user_id: user.id(),
            role: req.kinship.role,
        })
        .await?;
    Ok(Json(ApiResponse::success(kinship)))
}

/// 批量邀请
pub async fn create_invitations(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(family_id): Path<Uuid>,
    Json(req): Json<CreateInvitationsRequest>,
) -> Result<Json<ApiResponse<InvitationOutcomes>>, ApiError> {
    let outcomes = state
        .create_invitations_handler
        .handle(CreateInvitations {
            family_id,
            sender_id: user.id(),
            users: req.users.into_iter().map(Into::into).collect(),
            message: req.message,
        })
        .await?;
    Ok(Json(ApiResponse::success(outcomes)))
}

/// 重发邀请
pub async fn resend_invitations(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(family_id): Path<Uuid>,
    Json(req): Json<ResendInvitationsRequest>,
) -> Result<Json<ApiResponse<ResendOutcome>>, ApiError> {
    let outcome = state
        .resend_invitations_handler
        .handle(ResendInvitations {
            family_id,
            user_id: user.id(),
            ids: req.ids,
        })
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}
