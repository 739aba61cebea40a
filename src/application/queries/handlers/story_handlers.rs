//! Story Query Handlers

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::ensure_story_reader;
use crate::application::error::ApplicationError;
use crate::application::ports::{FamilyRepositoryPort, StoryRepositoryPort, StoryScope};
use crate::application::queries::{GetStory, ListStories};
use crate::domain::story::{Publication, Section, Story, StoryId};

// ============================================================================
// Response DTOs
// ============================================================================

/// 段落响应
#[derive(Debug, Clone, Serialize)]
pub struct SectionResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub position: u32,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id(),
            author_id: section.author_id(),
            position: section.position(),
            title: section.title().to_string(),
            body: section.body().to_string(),
            created_at: section.created_at().to_rfc3339(),
        }
    }
}

/// 发布记录响应
#[derive(Debug, Clone, Serialize)]
pub struct PublicationResponse {
    pub id: Uuid,
    pub family_id: Uuid,
    pub publish_on: Option<NaiveDate>,
    pub privacy: String,
}

impl From<&Publication> for PublicationResponse {
    fn from(publication: &Publication) -> Self {
        Self {
            id: publication.id(),
            family_id: publication.family_id(),
            publish_on: publication.publish_on(),
            privacy: publication.privacy().as_str().to_string(),
        }
    }
}

/// 故事详情响应
#[derive(Debug, Clone, Serialize)]
pub struct StoryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub is_range: bool,
    pub start_year: Option<String>,
    pub start_month: Option<String>,
    pub start_day: Option<String>,
    pub end_year: Option<String>,
    pub end_month: Option<String>,
    pub end_day: Option<String>,
    pub date_as_text: String,
    pub sections_count: usize,
    pub sections: Vec<SectionResponse>,
    pub contributors: Vec<Uuid>,
    pub publications: Vec<PublicationResponse>,
    pub draft: bool,
    pub published: bool,
    pub time_capsule: bool,
    pub time_capsule_released: bool,
    pub read: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl StoryResponse {
    pub fn new(story: &Story, today: NaiveDate, read: bool) -> Self {
        let date = story.date();
        Self {
            id: *story.id().as_uuid(),
            user_id: story.user_id(),
            title: story.title().to_string(),
            description: story.description().to_string(),
            tags: story.tags().to_vec(),
            is_range: date.is_range,
            start_year: date.start_year.clone(),
            start_month: date.start_month.clone(),
            start_day: date.start_day.clone(),
            end_year: date.end_year.clone(),
            end_month: date.end_month.clone(),
            end_day: date.end_day.clone(),
            date_as_text: story.date_as_text().to_string(),
            sections_count: story.sections_count(),
            sections: story.sections().iter().map(SectionResponse::from).collect(),
            contributors: story.contributors(),
            publications: story
                .publications()
                .iter()
                .map(PublicationResponse::from)
                .collect(),
            draft: story.is_draft(),
            published: story.is_published(today),
            time_capsule: story.is_time_capsule(),
            time_capsule_released: story.is_time_capsule_released(today),
            read,
            created_at: story.created_at().to_rfc3339(),
            updated_at: story.updated_at().to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetStory Handler
pub struct GetStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    family_repo: Arc<dyn FamilyRepositoryPort>,
}

impl GetStoryHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        family_repo: Arc<dyn FamilyRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            family_repo,
        }
    }

    pub async fn handle(&self, query: GetStory) -> Result<StoryResponse, ApplicationError> {
        let story_id = StoryId::from_uuid(query.story_id);
        let story = self
            .story_repo
            .find_by_id(story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", query.story_id))?;

        let today = Utc::now().date_naive();
        ensure_story_reader(&story, query.user_id, self.family_repo.as_ref(), today).await?;

        // 响应里返回的是打开之前的已读状态
        let read = self.story_repo.is_read_by(story_id, query.user_id).await?;
        self.story_repo.mark_as_read(story_id, query.user_id).await?;

        Ok(StoryResponse::new(&story, today, read))
    }
}

/// ListStories Handler
pub struct ListStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStories) -> Result<Vec<StoryResponse>, ApplicationError> {
        let today = Utc::now().date_naive();
        let stories = self.story_repo.find_by_user(query.user_id).await?;

        let mut responses = Vec::new();
        for story in stories {
            let included = match query.scope {
                StoryScope::All => true,
                StoryScope::Draft => story.is_draft(),
                StoryScope::Published => story.is_published(today),
            };
            if !included {
                continue;
            }
            let read = self.story_repo.is_read_by(story.id(), query.user_id).await?;
            responses.push(StoryResponse::new(&story, today, read));
        }

        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::{CreateStoryHandler, PublishStoryHandler};
    use crate::application::commands::{CreateStory, PublishStory};
    use crate::domain::story::PublicationPrivacy;
    use crate::testing::TestContext;

    async fn create_story(ctx: &TestContext, user_id: Uuid, title: &str) -> Uuid {
        let handler = CreateStoryHandler::new(ctx.story_repo.clone());
        handler
            .handle(CreateStory {
                user_id,
                title: Some(title.to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_list_scopes() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("Alice", "alice@example.com").await;
        let family = ctx.create_family(owner, "The Smiths").await;

        let draft = create_story(&ctx, owner, "Draft story").await;
        let released = create_story(&ctx, owner, "Released").await;
        let capsule = create_story(&ctx, owner, "Time capsule").await;

        let publish = PublishStoryHandler::new(ctx.story_repo.clone(), ctx.family_repo.clone());
        publish
            .handle(PublishStory {
                story_id: released,
                user_id: owner,
                family_id: family,
                publish_on: NaiveDate::from_ymd_opt(2001, 1, 1),
                privacy: PublicationPrivacy::Family,
            })
            .await
            .unwrap();
        publish
            .handle(PublishStory {
                story_id: capsule,
                user_id: owner,
                family_id: family,
                publish_on: NaiveDate::from_ymd_opt(2999, 1, 1),
                privacy: PublicationPrivacy::Family,
            })
            .await
            .unwrap();

        let handler = ListStoriesHandler::new(ctx.story_repo.clone());
        let ids = |scope| {
            let handler = &handler;
            async move {
                handler
                    .handle(ListStories { user_id: owner, scope })
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|s| s.id)
                    .collect::<Vec<_>>()
            }
        };

        assert_eq!(ids(StoryScope::Draft).await, vec![draft]);
        assert_eq!(ids(StoryScope::Published).await, vec![released]);
        assert_eq!(ids(StoryScope::All).await.len(), 3);
    }

    #[tokio::test]
    async fn test_get_story_requires_access() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("Alice", "alice@example.com").await;
        let relative = ctx.create_user("Bob", "bob@example.com").await;
        let stranger = ctx.create_user("Eve", "eve@example.com").await;
        let family = ctx.create_family(owner, "The Smiths").await;
        ctx.add_member(family, relative).await;

        let story_id = create_story(&ctx, owner, "Grandpa's war letters").await;
        let handler = GetStoryHandler::new(ctx.story_repo.clone(), ctx.family_repo.clone());

        let owner_view = handler
            .handle(GetStory { story_id, user_id: owner })
            .await
            .unwrap();
        assert!(owner_view.read);
        assert!(owner_view.draft);

        let denied = handler
            .handle(GetStory { story_id, user_id: relative })
            .await;
        assert!(matches!(denied, Err(ApplicationError::PermissionDenied(_))));

        PublishStoryHandler::new(ctx.story_repo.clone(), ctx.family_repo.clone())
            .handle(PublishStory {
                story_id,
                user_id: owner,
                family_id: family,
                publish_on: None,
                privacy: PublicationPrivacy::Family,
            })
            .await
            .unwrap();

        let relative_view = handler
            .handle(GetStory { story_id, user_id: relative })
            .await
            .unwrap();
        assert!(relative_view.published);
        assert!(!relative_view.read);

        let denied = handler
            .handle(GetStory { story_id, user_id: stranger })
            .await;
        assert!(matches!(denied, Err(ApplicationError::PermissionDenied(_))));
    }
}
