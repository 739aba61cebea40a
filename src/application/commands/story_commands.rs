//! Story Commands

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::story::{is_blank, DateSpec, PublicationPrivacy};

/// 日期字段输入
///
/// `None` 表示未提交；提交了空白值表示清空该字段
#[derive(Debug, Clone, Default)]
pub struct DateInput {
    pub is_range: Option<bool>,
    pub start_year: Option<String>,
    pub start_month: Option<String>,
    pub start_day: Option<String>,
    pub end_year: Option<String>,
    pub end_month: Option<String>,
    pub end_day: Option<String>,
}

impl DateInput {
    /// 在当前日期字段上应用本次输入
    pub fn apply_to(&self, current: &DateSpec) -> DateSpec {
        fn merge(input: &Option<String>, current: &Option<String>) -> Option<String> {
            match input {
                None => current.clone(),
                Some(value) if is_blank(value) => None,
                Some(value) => Some(value.clone()),
            }
        }

        DateSpec {
            is_range: self.is_range.unwrap_or(current.is_range),
            start_year: merge(&self.start_year, &current.start_year),
            start_month: merge(&self.start_month, &current.start_month),
            start_day: merge(&self.start_day, &current.start_day),
            end_year: merge(&self.end_year, &current.end_year),
            end_month: merge(&self.end_month, &current.end_month),
            end_day: merge(&self.end_day, &current.end_day),
        }
    }
}

/// 创建故事命令
#[derive(Debug, Clone, Default)]
pub struct CreateStory {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub date: DateInput,
}

/// 更新故事命令
#[derive(Debug, Clone, Default)]
pub struct UpdateStory {
    pub story_id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub date: DateInput,
}

/// 删除故事命令
#[derive(Debug, Clone)]
pub struct DeleteStory {
    pub story_id: Uuid,
    pub user_id: Uuid,
}

/// 添加段落命令
#[derive(Debug, Clone)]
pub struct AddSection {
    pub story_id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// 移除某位参与者在故事中的全部内容
#[derive(Debug, Clone)]
pub struct RemoveContributor {
    pub story_id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

/// 发布故事命令
#[derive(Debug, Clone)]
pub struct PublishStory {
    pub story_id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub publish_on: Option<NaiveDate>,
    pub privacy: PublicationPrivacy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_merges_fields() {
        let current = DateSpec::single("2020", "May", "1");
        let input = DateInput {
            start_day: Some("  ".to_string()),
            start_month: Some("June".to_string()),
            ..Default::default()
        };

        let merged = input.apply_to(&current);
        assert!(!merged.is_range);
        assert_eq!(merged.start_year.as_deref(), Some("2020"));
        assert_eq!(merged.start_month.as_deref(), Some("June"));
        assert_eq!(merged.start_day, None);
    }
}
