//! Story Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::sanitizer::sanitize;

/// 故事唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 发布可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationPrivacy {
    /// 家庭成员可见
    Family,
    /// 仅作者可见
    Private,
}

impl PublicationPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationPrivacy::Family => "family",
            PublicationPrivacy::Private => "private",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "family" => Some(PublicationPrivacy::Family),
            "private" => Some(PublicationPrivacy::Private),
            _ => None,
        }
    }
}

impl Default for PublicationPrivacy {
    fn default() -> Self {
        PublicationPrivacy::Family
    }
}

/// 整理分类标签：清洗、去空、去重（保留首次出现的顺序）
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = sanitize(tag.as_ref());
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
