//! Story HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AddSection, CreateStory, DeleteStory, GetStory, ListStories, PublishStory,
    RemoveContributor, RemoveContributorResponse, SectionResponse, StoryResponse, StoryScope,
    UpdateStory,
};
use crate::domain::story::PublicationPrivacy;
use crate::infrastructure::http::dto::{
    AddSectionRequest, ApiResponse, Empty, ListStoriesParams, PublishStoryRequest, StoryRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::CurrentUser;
use crate::infrastructure::http::state::AppState;

/// 创建故事
pub async fn create_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<StoryRequest>,
) -> Result<Json<ApiResponse<StoryResponse>>, ApiError> {
    let command = CreateStory {
        user_id: user.id(),
        date: req.date_input(),
        title: req.title,
        description: req.description,
        categories: req.categories,
    };

    let story = state.create_story_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(story)))
}

/// 列出当前用户的故事
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<ListStoriesParams>,
) -> Result<Json<ApiResponse<Vec<StoryResponse>>>, ApiError> {
    let scope = match params.scope.as_deref() {
        None | Some("") => StoryScope::default(),
        Some(raw) => StoryScope::from_str(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown scope: {}", raw)))?,
    };

    let stories = state
        .list_stories_handler
        .handle(ListStories {
            user_id: user.id(),
            scope,
        })
        .await?;
    Ok(Json(ApiResponse::success(stories)))
}

/// 故事详情，同时标记为已读
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<ApiResponse<StoryResponse>>, ApiError> {
    let story = state
        .get_story_handler
        .handle(GetStory {
            story_id,
            user_id: user.id(),
        })
        .await?;
    Ok(Json(ApiResponse::success(story)))
}

/// 更新故事
pub async fn update_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(story_id): Path<Uuid>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<ApiResponse<StoryResponse>>, ApiError> {
    let command = UpdateStory {
        story_id,
        user_id: user.id(),
        date: req.date_input(),
        title: req.title,
        description: req.description,
        categories: req.categories,
    };

    let story = state.update_story_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(story)))
}

/// 删除故事
pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_story_handler
        .handle(DeleteStory {
            story_id,
            user_id: user.id(),
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// 添加段落
pub async fn add_section(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(story_id): Path<Uuid>,
    Json(req): Json<AddSectionRequest>,
) -> Result<Json<ApiResponse<SectionResponse>>, ApiError> {
    let section = state
        .add_section_handler
        .handle(AddSection {
            story_id,
            user_id: user.id(),
            title: req.title,
            body: req.body,
        })
        .await?;
    Ok(Json(ApiResponse::success(section)))
}

/// 移除参与者写的全部段落
pub async fn remove_contributor(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path((story_id, author_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<RemoveContributorResponse>>, ApiError> {
    let result = state
        .remove_contributor_handler
        .handle(RemoveContributor {
            story_id,
            user_id: user.id(),
            author_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 发布到家庭
pub async fn publish_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(story_id): Path<Uuid>,
    Json(req): Json<PublishStoryRequest>,
) -> Result<Json<ApiResponse<StoryResponse>>, ApiError> {
    let privacy = match req.privacy.as_deref() {
        None => PublicationPrivacy::default(),
        Some(raw) => PublicationPrivacy::from_str(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown privacy: {}", raw)))?,
    };

    let story = state
        .publish_story_handler
        .handle(PublishStory {
            story_id,
            user_id: user.id(),
            family_id: req.family_id,
            publish_on: req.publish_on,
            privacy,
        })
        .await?;
    Ok(Json(ApiResponse::success(story)))
}
