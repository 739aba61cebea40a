//! Story Context - Entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicationPrivacy;

/// 故事段落
///
/// 不变量:
/// - position 在 Story 内唯一且递增
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: Uuid,
    author_id: Uuid,
    position: u32,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl Section {
    pub fn new(author_id: Uuid, position: u32, title: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            position,
            title,
            body,
            created_at: Utc::now(),
        }
    }

    /// 从存储恢复
    pub fn restore(
        id: Uuid,
        author_id: Uuid,
        position: u32,
        title: String,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            position,
            title,
            body,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 发布记录：把故事发布到某个家庭
///
/// `publish_on` 为将来日期时即为"时间胶囊"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    id: Uuid,
    family_id: Uuid,
    publish_on: Option<NaiveDate>,
    privacy: PublicationPrivacy,
    created_at: DateTime<Utc>,
}

impl Publication {
    pub fn new(family_id: Uuid, publish_on: Option<NaiveDate>, privacy: PublicationPrivacy) -> Self {
        Self {
            id: Uuid::new_v4(),
            family_id,
            publish_on,
            privacy,
            created_at: Utc::now(),
        }
    }

    /// 从存储恢复
    pub fn restore(
        id: Uuid,
        family_id: Uuid,
        publish_on: Option<NaiveDate>,
        privacy: PublicationPrivacy,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            family_id,
            publish_on,
            privacy,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn family_id(&self) -> Uuid {
        self.family_id
    }

    pub fn publish_on(&self) -> Option<NaiveDate> {
        self.publish_on
    }

    pub fn privacy(&self) -> PublicationPrivacy {
        self.privacy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 截至 `today` 是否对家庭成员可见
    pub fn is_visible_on(&self, today: NaiveDate) -> bool {
        self.privacy != PublicationPrivacy::Private
            && self.publish_on.map_or(true, |date| date <= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_publication_visibility() {
        let today = date("2024-05-01");
        let family = Uuid::new_v4();

        assert!(Publication::new(family, None, PublicationPrivacy::Family).is_visible_on(today));
        assert!(Publication::new(family, Some(today), PublicationPrivacy::Family).is_visible_on(today));
        assert!(!Publication::new(family, Some(date("2024-05-02")), PublicationPrivacy::Family)
            .is_visible_on(today));
        assert!(!Publication::new(family, None, PublicationPrivacy::Private).is_visible_on(today));
    }
}
