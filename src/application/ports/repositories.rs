//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::family::{Family, FamilyId, Invitation, Kinship};
use crate::domain::story::{Publication, Section, Story, StoryId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// 已规范化（小写）的邮箱
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 保存用户，邮箱重复时返回 Duplicate
    async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

// ============================================================================
// Story Repository
// ============================================================================

/// 故事列表范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryScope {
    /// 全部
    All,
    /// 草稿（未发布到任何家庭）
    Draft,
    /// 已发布且对家庭可见
    Published,
}

impl StoryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryScope::All => "all",
            StoryScope::Draft => "draft",
            StoryScope::Published => "published",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StoryScope::All),
            "draft" => Some(StoryScope::Draft),
            "published" => Some(StoryScope::Published),
            _ => None,
        }
    }
}

impl Default for StoryScope {
    fn default() -> Self {
        StoryScope::All
    }
}

/// Story Repository Port
///
/// 以聚合为单位加载。段落和发布记录不随 `save` 写入，只能逐条追加或按作者删除，
/// 多位家庭成员同时写同一个故事时互不覆盖
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    /// 保存故事本身的字段
    async fn save(&self, story: &Story) -> Result<(), RepositoryError>;

    /// 追加段落并刷新故事更新时间，返回实际写入的位置（当前最大位置 + 1）
    async fn add_section(&self, story_id: StoryId, section: &Section) -> Result<u32, RepositoryError>;

    /// 删除某位作者的全部段落，返回删除数量
    async fn remove_sections_by_author(
        &self,
        story_id: StoryId,
        author_id: Uuid,
    ) -> Result<u64, RepositoryError>;

    /// 追加发布记录并刷新故事更新时间
    async fn add_publication(
        &self,
        story_id: StoryId,
        publication: &Publication,
    ) -> Result<(), RepositoryError>;

    /// 根据 ID 查找故事
    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;

    /// 获取用户的所有故事，按创建时间倒序
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Story>, RepositoryError>;

    /// 删除故事
    async fn delete(&self, id: StoryId) -> Result<(), RepositoryError>;

    /// 标记为已读
    async fn mark_as_read(&self, story_id: StoryId, user_id: Uuid) -> Result<(), RepositoryError>;

    /// 清除用户的已读标记
    async fn unmark_as_read(&self, story_id: StoryId, user_id: Uuid)
        -> Result<(), RepositoryError>;

    /// 用户是否已读（故事在标记之后又有更新则视为未读）
    async fn is_read_by(&self, story_id: StoryId, user_id: Uuid) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Family Repository
// ============================================================================

/// Family Repository Port
#[async_trait]
pub trait FamilyRepositoryPort: Send + Sync {
    /// 保存家庭
    async fn save(&self, family: &Family) -> Result<(), RepositoryError>;

    /// 根据 ID 查找家庭
    async fn find_by_id(&self, id: FamilyId) -> Result<Option<Family>, RepositoryError>;

    /// 保存成员关系
    async fn save_kinship(&self, kinship: &Kinship) -> Result<(), RepositoryError>;

    /// 根据 ID 查找成员关系
    async fn find_kinship(&self, id: Uuid) -> Result<Option<Kinship>, RepositoryError>;

    /// 查找用户在家庭中的成员关系
    async fn find_membership(
        &self,
        family_id: FamilyId,
        user_id: Uuid,
    ) -> Result<Option<Kinship>, RepositoryError>;

    /// 获取家庭的所有成员关系
    async fn find_members(&self, family_id: FamilyId) -> Result<Vec<Kinship>, RepositoryError>;
}

// ============================================================================
// Invitation Repository
// ============================================================================

/// Invitation Repository Port
#[async_trait]
pub trait InvitationRepositoryPort: Send + Sync {
    /// 保存邀请
    async fn save(&self, invitation: &Invitation) -> Result<(), RepositoryError>;

    /// 根据 ID 查找邀请
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, RepositoryError>;

    /// 查找家庭发给某个已注册用户的邀请
    async fn find_by_recipient(
        &self,
        family_id: FamilyId,
        recipient_id: Uuid,
    ) -> Result<Option<Invitation>, RepositoryError>;

    /// 批量获取家庭中指定 ID 的邀请（不属于该家庭的 ID 被忽略）
    async fn find_by_ids(
        &self,
        family_id: FamilyId,
        ids: &[Uuid],
    ) -> Result<Vec<Invitation>, RepositoryError>;
}
