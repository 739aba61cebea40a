//! Story Queries

use uuid::Uuid;

use crate::application::ports::StoryScope;

/// 获取故事详情查询
#[derive(Debug, Clone)]
pub struct GetStory {
    pub story_id: Uuid,
    pub user_id: Uuid,
}

/// 列出用户故事查询
#[derive(Debug, Clone)]
pub struct ListStories {
    pub user_id: Uuid,
    pub scope: StoryScope,
}
