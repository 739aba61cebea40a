//! Story Context - Aggregate Root

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    normalize_tags, DateSpec, Publication, Section, StoryDateComposer, StoryError, StoryId,
};
use crate::domain::validation::FieldError;

/// 从存储恢复 Story 时使用的完整字段集合
#[derive(Debug, Clone)]
pub struct StoryParts {
    pub id: StoryId,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: DateSpec,
    pub date_as_text: String,
    pub sections: Vec<Section>,
    pub publications: Vec<Publication>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Story 聚合根
///
/// 不变量:
/// - 标题不能为空
/// - 区间日期的六个字段必须齐全且结束不早于开始
/// - `date_as_text` 只能由日期字段推导，保存前若日期字段有变化则重新生成
/// - 段落按 position 有序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    user_id: Uuid,
    title: String,
    description: String,
    tags: Vec<String>,
    date: DateSpec,
    date_as_text: String,
    /// 上次保存时的日期字段，用于判断是否需要重新生成文本
    persisted_date: DateSpec,
    sections: Vec<Section>,
    publications: Vec<Publication>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Story {
    /// 创建新故事
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            user_id,
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            date: DateSpec::default(),
            date_as_text: String::new(),
            persisted_date: DateSpec::default(),
            sections: Vec::new(),
            publications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 从存储恢复，当前日期字段即为已保存状态
    pub fn from_parts(parts: StoryParts) -> Self {
        let mut sections = parts.sections;
        sections.sort_by_key(Section::position);
        Self {
            id: parts.id,
            user_id: parts.user_id,
            title: parts.title,
            description: parts.description,
            tags: parts.tags,
            persisted_date: parts.date.clone(),
            date: parts.date,
            date_as_text: parts.date_as_text,
            sections,
            publications: parts.publications,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
    }

    pub fn set_date(&mut self, date: DateSpec) {
        self.date = date;
    }

    /// 自上次保存以来日期字段是否有变化
    pub fn date_fields_changed(&self) -> bool {
        !self.date.same_fields(&self.persisted_date)
    }

    /// 校验，收集全部字段错误
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::blank("title"));
        }

        if self.date.is_range {
            errors.extend(
                self.date
                    .blank_fields()
                    .into_iter()
                    .map(|field| FieldError::blank(field.as_str())),
            );
            errors.extend(
                StoryDateComposer::validate_range(&self.date)
                    .into_iter()
                    .map(FieldError::from),
            );
        }

        errors
    }

    /// 保存前钩子
    ///
    /// 校验失败时不做任何修改并返回全部错误；通过后按需刷新 `date_as_text`。
    /// 返回日期文本是否重新生成。
    pub fn prepare_for_save(&mut self) -> Result<bool, StoryError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(StoryError::Invalid(errors));
        }

        let changed = self.date_fields_changed();
        let refreshed = StoryDateComposer::populate(&self.date, changed, &mut self.date_as_text);
        self.updated_at = Utc::now();
        Ok(refreshed)
    }

    /// 保存成功后记录日期字段快照
    pub fn mark_persisted(&mut self) {
        self.persisted_date = self.date.clone();
    }

    /// 追加段落，位置排在最后
    pub fn add_section(&mut self, author_id: Uuid, title: String, body: String) -> &Section {
        let position = self
            .sections
            .iter()
            .map(Section::position)
            .max()
            .map_or(1, |max| max + 1);
        self.sections.push(Section::new(author_id, position, title, body));
        self.updated_at = Utc::now();
        &self.sections[self.sections.len() - 1]
    }

    pub fn add_publication(&mut self, publication: Publication) {
        self.publications.push(publication);
        self.updated_at = Utc::now();
    }

    /// 删除某位作者在本故事中的所有段落，返回删除数量
    pub fn delete_all_contents_by_author(&mut self, author_id: Uuid) -> usize {
        let before = self.sections.len();
        self.sections.retain(|section| section.author_id() != author_id);
        before - self.sections.len()
    }

    /// 参与者：除作者本人以外写过段落的用户（去重，按首次出现排序）
    pub fn contributors(&self) -> Vec<Uuid> {
        let mut contributors = Vec::new();
        for section in &self.sections {
            let author = section.author_id();
            if author != self.user_id && !contributors.contains(&author) {
                contributors.push(author);
            }
        }
        contributors
    }

    /// 时间胶囊即第一条发布记录
    pub fn time_capsule(&self) -> Option<&Publication> {
        self.publications.first()
    }

    pub fn is_time_capsule(&self) -> bool {
        self.time_capsule()
            .and_then(Publication::publish_on)
            .is_some()
    }

    pub fn is_time_capsule_released(&self, today: NaiveDate) -> bool {
        self.time_capsule()
            .and_then(Publication::publish_on)
            .map_or(false, |date| date <= today)
    }

    /// 草稿：没有任何发布记录
    pub fn is_draft(&self) -> bool {
        self.publications.is_empty()
    }

    /// 已发布：至少有一条非私密、已到发布日期的记录
    pub fn is_published(&self, today: NaiveDate) -> bool {
        self.publications.iter().any(|p| p.is_visible_on(today))
    }

    /// 已发布到的家庭
    pub fn family_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::new();
        for publication in &self.publications {
            if !ids.contains(&publication.family_id()) {
                ids.push(publication.family_id());
            }
        }
        ids
    }

    // Getters
    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn date(&self) -> &DateSpec {
        &self.date
    }

    pub fn date_as_text(&self) -> &str {
        &self.date_as_text
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_count(&self) -> usize {
        self.sections.len()
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
