//! 访问检查
//!
//! 只做家庭成员身份和故事归属判断，完整的权限策略不在本服务内

use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::FamilyRepositoryPort;
use crate::domain::family::{FamilyId, Kinship};
use crate::domain::story::Story;

/// 要求调用方是故事作者
pub fn ensure_story_owner(story: &Story, user_id: Uuid) -> Result<(), ApplicationError> {
    if story.user_id() != user_id {
        return Err(ApplicationError::permission_denied(format!(
            "story {} belongs to another user",
            story.id()
        )));
    }
    Ok(())
}

/// 要求调用方可以阅读故事：作者本人，或故事已对其所在家庭可见
pub async fn ensure_story_reader(
    story: &Story,
    user_id: Uuid,
    family_repo: &dyn FamilyRepositoryPort,
    today: NaiveDate,
) -> Result<(), ApplicationError> {
    if story.user_id() == user_id {
        return Ok(());
    }

    for publication in story.publications() {
        if !publication.is_visible_on(today) {
            continue;
        }
        let family_id = FamilyId::from_uuid(publication.family_id());
        if family_repo.find_membership(family_id, user_id).await?.is_some() {
            return Ok(());
        }
    }

    Err(ApplicationError::permission_denied(format!(
        "story {} is not shared with you",
        story.id()
    )))
}

/// 要求调用方是家庭成员，返回其成员关系
pub async fn require_membership(
    family_repo: &dyn FamilyRepositoryPort,
    family_id: FamilyId,
    user_id: Uuid,
) -> Result<Kinship, ApplicationError> {
    family_repo
        .find_membership(family_id, user_id)
        .await?
        .ok_or_else(|| {
            ApplicationError::permission_denied(format!("not a member of family {}", family_id))
        })
}
