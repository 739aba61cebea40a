//! SQLite Story Repository
//!
//! 故事按聚合整体加载。写入时故事行与子表分开：段落和发布记录逐行追加或按作者删除，
//! 保存故事不会覆盖其他请求刚写入的子记录

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_timestamp, parse_uuid};
use super::DbPool;
use crate::application::ports::{RepositoryError, StoryRepositoryPort};
use crate::domain::story::{
    DateSpec, Publication, PublicationPrivacy, Section, Story, StoryId, StoryParts,
};

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_children(&self, row: StoryRow) -> Result<Story, RepositoryError> {
        let sections: Vec<SectionRow> = sqlx::query_as(
            "SELECT id, author_id, position, title, body, created_at FROM sections WHERE story_id = ? ORDER BY position",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let publications: Vec<PublicationRow> = sqlx::query_as(
            "SELECT id, family_id, publish_on, privacy, created_at FROM publications WHERE story_id = ? ORDER BY created_at, rowid",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let sections = sections
            .into_iter()
            .map(Section::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let publications = publications
            .into_iter()
            .map(Publication::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        row.into_story(sections, publications)
    }
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    tags: String,
    is_range: bool,
    start_year: Option<String>,
    start_month: Option<String>,
    start_day: Option<String>,
    end_year: Option<String>,
    end_month: Option<String>,
    end_day: Option<String>,
    date_as_text: String,
    created_at: String,
    updated_at: String,
}

impl StoryRow {
    fn into_story(
        self,
        sections: Vec<Section>,
        publications: Vec<Publication>,
    ) -> Result<Story, RepositoryError> {
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(Story::from_parts(StoryParts {
            id: StoryId::from_uuid(parse_uuid(&self.id)?),
            user_id: parse_uuid(&self.user_id)?,
            title: self.title,
            description: self.description,
            tags,
            date: DateSpec {
                is_range: self.is_range,
                start_year: self.start_year,
                start_month: self.start_month,
                start_day: self.start_day,
                end_year: self.end_year,
                end_month: self.end_month,
                end_day: self.end_day,
            },
            date_as_text: self.date_as_text,
            sections,
            publications,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        }))
    }
}

#[derive(FromRow)]
struct SectionRow {
    id: String,
    author_id: String,
    position: i64,
    title: String,
    body: String,
    created_at: String,
}

impl TryFrom<SectionRow> for Section {
    type Error = RepositoryError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(Section::restore(
            parse_uuid(&row.id)?,
            parse_uuid(&row.author_id)?,
            row.position as u32,
            row.title,
            row.body,
            parse_timestamp(&row.created_at)?,
        ))
    }
}

#[derive(FromRow)]
struct PublicationRow {
    id: String,
    family_id: String,
    publish_on: Option<String>,
    privacy: String,
    created_at: String,
}

impl TryFrom<PublicationRow> for Publication {
    type Error = RepositoryError;

    fn try_from(row: PublicationRow) -> Result<Self, Self::Error> {
        let publish_on = row
            .publish_on
            .as_deref()
            .map(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        let privacy = PublicationPrivacy::from_str(&row.privacy).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown privacy: {}", row.privacy))
        })?;

        Ok(Publication::restore(
            parse_uuid(&row.id)?,
            parse_uuid(&row.family_id)?,
            publish_on,
            privacy,
            parse_timestamp(&row.created_at)?,
        ))
    }
}

/// 刷新故事的 updated_at，让已有的已读标记失效
async fn touch_story(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    story_id: &str,
    updated_at: &str,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE stories SET updated_at = ? WHERE id = ?")
        .bind(updated_at)
        .bind(story_id)
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(format!("story {}", story_id)));
    }
    Ok(())
}

const SELECT_STORIES: &str = r#"
    SELECT id, user_id, title, description, tags, is_range,
           start_year, start_month, start_day, end_year, end_month, end_day,
           date_as_text, created_at, updated_at
    FROM stories
"#;

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn save(&self, story: &Story) -> Result<(), RepositoryError> {
        let story_id = story.id().to_string();
        let date = story.date();
        let tags = serde_json::to_string(story.tags())
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        // upsert 走 UPDATE 分支，不会级联删除已读标记和子表
        sqlx::query(
            r#"
            INSERT INTO stories (
                id, user_id, title, description, tags, is_range,
                start_year, start_month, start_day, end_year, end_month, end_day,
                date_as_text, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                tags = excluded.tags,
                is_range = excluded.is_range,
                start_year = excluded.start_year,
                start_month = excluded.start_month,
                start_day = excluded.start_day,
                end_year = excluded.end_year,
                end_month = excluded.end_month,
                end_day = excluded.end_day,
                date_as_text = excluded.date_as_text,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&story_id)
        .bind(story.user_id().to_string())
        .bind(story.title())
        .bind(story.description())
        .bind(&tags)
        .bind(date.is_range)
        .bind(date.start_year.as_deref())
        .bind(date.start_month.as_deref())
        .bind(date.start_day.as_deref())
        .bind(date.end_year.as_deref())
        .bind(date.end_month.as_deref())
        .bind(date.end_day.as_deref())
        .bind(story.date_as_text())
        .bind(story.created_at().to_rfc3339())
        .bind(story.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn add_section(&self, story_id: StoryId, section: &Section) -> Result<u32, RepositoryError> {
        let story_id = story_id.to_string();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 位置在插入语句内计算，并发追加不会拿到相同的位置
        sqlx::query(
            r#"
            INSERT INTO sections (id, story_id, author_id, position, title, body, created_at)
            SELECT ?, ?, ?, COALESCE(MAX(position), 0) + 1, ?, ?, ?
            FROM sections WHERE story_id = ?
            "#,
        )
        .bind(section.id().to_string())
        .bind(&story_id)
        .bind(section.author_id().to_string())
        .bind(section.title())
        .bind(section.body())
        .bind(section.created_at().to_rfc3339())
        .bind(&story_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        touch_story(&mut tx, &story_id, &section.created_at().to_rfc3339()).await?;

        let (position,): (i64,) = sqlx::query_as("SELECT position FROM sections WHERE id = ?")
            .bind(section.id().to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(position as u32)
    }

    async fn remove_sections_by_author(
        &self,
        story_id: StoryId,
        author_id: Uuid,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sections WHERE story_id = ? AND author_id = ?")
            .bind(story_id.to_string())
            .bind(author_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    async fn add_publication(
        &self,
        story_id: StoryId,
        publication: &Publication,
    ) -> Result<(), RepositoryError> {
        let story_id = story_id.to_string();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO publications (id, story_id, family_id, publish_on, privacy, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(publication.id().to_string())
        .bind(&story_id)
        .bind(publication.family_id().to_string())
        .bind(publication.publish_on().map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(publication.privacy().as_str())
        .bind(publication.created_at().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        touch_story(&mut tx, &story_id, &publication.created_at().to_rfc3339()).await?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        let row: Option<StoryRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_STORIES))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(self.load_children(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Story>, RepositoryError> {
        let rows: Vec<StoryRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            SELECT_STORIES
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut stories = Vec::with_capacity(rows.len());
        for row in rows {
            stories.push(self.load_children(row).await?);
        }
        Ok(stories)
    }

    async fn delete(&self, id: StoryId) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for table in ["read_marks", "publications", "sections"] {
            sqlx::query(&format!("DELETE FROM {} WHERE story_id = ?", table))
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("story {}", id)));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn mark_as_read(&self, story_id: StoryId, user_id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO read_marks (story_id, user_id, read_at)
            VALUES (?, ?, ?)
            ON CONFLICT(story_id, user_id) DO UPDATE SET
                read_at = excluded.read_at
            "#,
        )
        .bind(story_id.to_string())
        .bind(user_id.to_string())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn unmark_as_read(
        &self,
        story_id: StoryId,
        user_id: Uuid,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM read_marks WHERE story_id = ? AND user_id = ?")
            .bind(story_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn is_read_by(&self, story_id: StoryId, user_id: Uuid) -> Result<bool, RepositoryError> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT r.read_at, s.updated_at
            FROM read_marks r
            JOIN stories s ON s.id = r.story_id
            WHERE r.story_id = ? AND r.user_id = ?
            "#,
        )
        .bind(story_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        match row {
            Some((read_at, updated_at)) => {
                Ok(parse_timestamp(&read_at)? >= parse_timestamp(&updated_at)?)
            }
            None => Ok(false),
        }
    }
}
