//! Story Command Handlers

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{ensure_story_owner, ensure_story_reader, require_membership};
use crate::application::commands::{
    AddSection, CreateStory, DeleteStory, PublishStory, RemoveContributor, UpdateStory,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{FamilyRepositoryPort, StoryRepositoryPort};
use crate::application::queries::handlers::{SectionResponse, StoryResponse};
use crate::domain::family::FamilyId;
use crate::domain::sanitize;
use crate::domain::story::{is_blank, Publication, Story, StoryId};
use crate::domain::validation::FieldError;

/// 丢弃空白参数，其余做清洗
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(v)).map(|v| sanitize(&v))
}

async fn load_story(
    repo: &dyn StoryRepositoryPort,
    story_id: Uuid,
) -> Result<Story, ApplicationError> {
    repo.find_by_id(StoryId::from_uuid(story_id))
        .await?
        .ok_or_else(|| ApplicationError::not_found("Story", story_id))
}

/// 校验、刷新日期文本并保存
async fn save_story(repo: &dyn StoryRepositoryPort, story: &mut Story) -> Result<bool, ApplicationError> {
    let refreshed = story.prepare_for_save()?;
    repo.save(story).await?;
    story.mark_persisted();
    Ok(refreshed)
}

// ============================================================================
// CreateStory
// ============================================================================

/// CreateStory Handler
pub struct CreateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: CreateStory) -> Result<StoryResponse, ApplicationError> {
        let mut story = Story::new(command.user_id, present(command.title).unwrap_or_default());

        if let Some(description) = present(command.description) {
            story.set_description(description);
        }
        if let Some(categories) = command.categories {
            story.set_tags(categories);
        }
        story.set_date(command.date.apply_to(story.date()));

        save_story(self.story_repo.as_ref(), &mut story).await?;
        self.story_repo
            .mark_as_read(story.id(), command.user_id)
            .await?;

        tracing::info!(
            story_id = %story.id(),
            user_id = %command.user_id,
            date_as_text = %story.date_as_text(),
            "Story created"
        );

        Ok(StoryResponse::new(&story, Utc::now().date_naive(), true))
    }
}

// ============================================================================
// UpdateStory
// ============================================================================

/// UpdateStory Handler - 只有作者可以修改
pub struct UpdateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: UpdateStory) -> Result<StoryResponse, ApplicationError> {
        let mut story = load_story(self.story_repo.as_ref(), command.story_id).await?;
        ensure_story_owner(&story, command.user_id)?;

        if let Some(title) = command.title {
            story.set_title(sanitize(&title));
        }
        if let Some(description) = command.description {
            story.set_description(sanitize(&description));
        }
        if let Some(categories) = command.categories {
            story.set_tags(categories);
        }
        story.set_date(command.date.apply_to(story.date()));

        let refreshed = save_story(self.story_repo.as_ref(), &mut story).await?;
        let read = self
            .story_repo
            .is_read_by(story.id(), command.user_id)
            .await?;

        tracing::info!(
            story_id = %story.id(),
            date_refreshed = refreshed,
            "Story updated"
        );

        Ok(StoryResponse::new(&story, Utc::now().date_naive(), read))
    }
}

// ============================================================================
// DeleteStory
// ============================================================================

/// DeleteStory Handler
pub struct DeleteStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: DeleteStory) -> Result<(), ApplicationError> {
        let story = load_story(self.story_repo.as_ref(), command.story_id).await?;
        ensure_story_owner(&story, command.user_id)?;

        self.story_repo.delete(story.id()).await?;

        tracing::info!(story_id = %story.id(), "Story deleted");
        Ok(())
    }
}

// ============================================================================
// AddSection
// ============================================================================

/// AddSection Handler - 作者本人或故事所发布家庭的成员
pub struct AddSectionHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    family_repo: Arc<dyn FamilyRepositoryPort>,
}

impl AddSectionHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        family_repo: Arc<dyn FamilyRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            family_repo,
        }
    }

    pub async fn handle(&self, command: AddSection) -> Result<SectionResponse, ApplicationError> {
        let mut story = load_story(self.story_repo.as_ref(), command.story_id).await?;
        ensure_story_reader(
            &story,
            command.user_id,
            self.family_repo.as_ref(),
            Utc::now().date_naive(),
        )
        .await?;

        let Some(body) = present(command.body) else {
            return Err(ApplicationError::Invalid(vec![FieldError::blank("body")]));
        };
        let title = present(command.title).unwrap_or_default();

        let added = story.add_section(command.user_id, title, body).clone();
        let position = self.story_repo.add_section(story.id(), &added).await?;
        let section = SectionResponse {
            position,
            ..SectionResponse::from(&added)
        };

        tracing::info!(
            story_id = %story.id(),
            section_id = %section.id,
            author_id = %command.user_id,
            position = section.position,
            "Section added"
        );

        Ok(section)
    }
}

// ============================================================================
// RemoveContributor
// ============================================================================

/// 移除参与者响应
#[derive(Debug, Clone, Serialize)]
pub struct RemoveContributorResponse {
    pub author_id: Uuid,
    pub removed_sections: usize,
}

/// RemoveContributor Handler - 作者删除某位参与者写的全部段落
pub struct RemoveContributorHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl RemoveContributorHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(
        &self,
        command: RemoveContributor,
    ) -> Result<RemoveContributorResponse, ApplicationError> {
        let story = load_story(self.story_repo.as_ref(), command.story_id).await?;
        ensure_story_owner(&story, command.user_id)?;

        if command.author_id == story.user_id() {
            return Err(ApplicationError::validation(
                "the story owner is not a contributor",
            ));
        }

        let removed = self
            .story_repo
            .remove_sections_by_author(story.id(), command.author_id)
            .await? as usize;
        self.story_repo
            .unmark_as_read(story.id(), command.author_id)
            .await?;

        tracing::info!(
            story_id = %story.id(),
            author_id = %command.author_id,
            removed_sections = removed,
            "Contributor removed"
        );

        Ok(RemoveContributorResponse {
            author_id: command.author_id,
            removed_sections: removed,
        })
    }
}

// ============================================================================
// PublishStory
// ============================================================================

/// PublishStory Handler - 作者把故事发布到自己所在的家庭
pub struct PublishStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    family_repo: Arc<dyn FamilyRepositoryPort>,
}

impl PublishStoryHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        family_repo: Arc<dyn FamilyRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            family_repo,
        }
    }

    pub async fn handle(&self, command: PublishStory) -> Result<StoryResponse, ApplicationError> {
        let mut story = load_story(self.story_repo.as_ref(), command.story_id).await?;
        ensure_story_owner(&story, command.user_id)?;

        let family_id = FamilyId::from_uuid(command.family_id);
        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Family", command.family_id))?;
        require_membership(self.family_repo.as_ref(), family_id, command.user_id).await?;

        let publication = Publication::new(command.family_id, command.publish_on, command.privacy);
        self.story_repo
            .add_publication(story.id(), &publication)
            .await?;
        story.add_publication(publication);
        self.story_repo
            .mark_as_read(story.id(), command.user_id)
            .await?;

        tracing::info!(
            story_id = %story.id(),
            family_id = %family_id,
            publish_on = ?command.publish_on,
            privacy = command.privacy.as_str(),
            "Story published"
        );

        Ok(StoryResponse::new(&story, Utc::now().date_naive(), true))
    }
}
