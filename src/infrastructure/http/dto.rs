//! Data Transfer Objects

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::commands::{DateInput, InviteeParams};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

/// 日期字段既可能是字符串也可能是数字（`"2020"` / `2020`）
///
/// 只在字段出现时调用：缺省字段由 `#[serde(default)]` 得到 `None`（保持原值），
/// 显式的 `null` 与 `""` 一样表示清空
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

// ============================================================================
// User DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

// ============================================================================
// Family DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
    #[serde(default)]
    pub personal_access: bool,
}

#[derive(Debug, Deserialize)]
pub struct KinshipRoleParams {
    pub role: String,
}

/// `{"kinship": {"role": "co_admin"}}`
#[derive(Debug, Deserialize)]
pub struct UpdateKinshipRoleRequest {
    pub kinship: KinshipRoleParams,
}

#[derive(Debug, Deserialize)]
pub struct InviteeRequest {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<InviteeRequest> for InviteeParams {
    fn from(req: InviteeRequest) -> Self {
        Self {
            id: req.id,
            email: req.email,
            role: req.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvitationsRequest {
    #[serde(default)]
    pub users: Vec<InviteeRequest>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResendInvitationsRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

// ============================================================================
// Story DTOs
// ============================================================================

/// 创建与更新故事共用的请求体，未提交的字段保持不变
#[derive(Debug, Default, Deserialize)]
pub struct StoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub is_range: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_month: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_month: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_day: Option<String>,
}

impl StoryRequest {
    pub fn date_input(&self) -> DateInput {
        DateInput {
            is_range: self.is_range,
            start_year: self.start_year.clone(),
            start_month: self.start_month.clone(),
            start_day: self.start_day.clone(),
            end_year: self.end_year.clone(),
            end_month: self.end_month.clone(),
            end_day: self.end_day.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListStoriesParams {
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PublishStoryRequest {
    pub family_id: Uuid,
    /// YYYY-MM-DD，设置后成为时间胶囊
    pub publish_on: Option<NaiveDate>,
    pub privacy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_request_accepts_numeric_dates() {
        let req: StoryRequest = serde_json::from_str(
            r#"{"title": "Trip", "is_range": true, "start_year": 2020, "start_month": "May", "end_year": "2021", "end_day": null}"#,
        )
        .unwrap();

        let date = req.date_input();
        assert_eq!(date.is_range, Some(true));
        assert_eq!(date.start_year.as_deref(), Some("2020"));
        assert_eq!(date.end_year.as_deref(), Some("2021"));
        assert_eq!(date.end_day.as_deref(), Some(""));
        assert_eq!(date.start_day, None);
        assert_eq!(date.end_month, None);
    }

    #[test]
    fn test_kinship_role_request_shape() {
        let req: UpdateKinshipRoleRequest =
            serde_json::from_str(r#"{"kinship": {"role": "co_admin"}}"#).unwrap();
        assert_eq!(req.kinship.role, "co_admin");
    }

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["errno"], 0);
        assert_eq!(json["error"], "");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
