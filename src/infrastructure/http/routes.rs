//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                                              GET    健康检查
//! - /api/v1/users                                          POST   注册用户
//! - /api/v1/families                                       POST   创建家庭
//! - /api/v1/families/:family_id/invitations                POST   批量邀请
//! - /api/v1/families/:family_id/invitations/resend         POST   重发邀请
//! - /api/v1/kinships/:kinship_id/role                      PATCH  修改成员角色
//! - /api/v1/stories                                        GET    列出故事（?scope=all|draft|published）
//! - /api/v1/stories                                        POST   创建故事
//! - /api/v1/stories/:story_id                              GET    故事详情
//! - /api/v1/stories/:story_id                              PATCH  更新故事
//! - /api/v1/stories/:story_id                              DELETE 删除故事
//! - /api/v1/stories/:story_id/sections                     POST   添加段落
//! - /api/v1/stories/:story_id/publications                 POST   发布到家庭
//! - /api/v1/stories/:story_id/contributors/:author_id      DELETE 移除参与者内容
//!
//! 除 /api/ping 与 POST /api/v1/users 外，都需要 `X-User-Id` 头

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/v1", v1_routes())
}

fn v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(handlers::create_user))
        .nest("/families", family_routes())
        .route("/kinships/:kinship_id/role", patch(handlers::update_kinship_role))
        .nest("/stories", story_routes())
}

/// Family 路由
fn family_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_family))
        .route("/:family_id/invitations", post(handlers::create_invitations))
        .route(
            "/:family_id/invitations/resend",
            post(handlers::resend_invitations),
        )
}

/// Story 路由
fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_stories).post(handlers::create_story),
        )
        .route(
            "/:story_id",
            get(handlers::get_story)
                .patch(handlers::update_story)
                .delete(handlers::delete_story),
        )
        .route("/:story_id/sections", post(handlers::add_section))
        .route("/:story_id/publications", post(handlers::publish_story))
        .route(
            "/:story_id/contributors/:author_id",
            delete(handlers::remove_contributor),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use uuid::Uuid;

    use crate::domain::family::FamilyId;
    use crate::infrastructure::http::extract::USER_ID_HEADER;
    use crate::testing::TestContext;

    fn app(ctx: &TestContext) -> Router {
        create_routes().with_state(Arc::new(ctx.app_state()))
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ping() {
        let ctx = TestContext::new().await;
        let (status, body) = send(app(&ctx), Method::GET, "/api/ping", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_requires_user_header() {
        let ctx = TestContext::new().await;

        let (status, body) = send(app(&ctx), Method::GET, "/api/v1/stories", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errno"], 401);

        let stranger = Some(Uuid::new_v4());
        let (status, _) = send(app(&ctx), Method::GET, "/api/v1/stories", stranger, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_user() {
        let ctx = TestContext::new().await;
        let payload = json!({ "name": "Alice", "email": "Alice@Example.com" });

        let (_, body) = send(app(&ctx), Method::POST, "/api/v1/users", None, Some(payload.clone())).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["email"], "alice@example.com");

        let (status, body) = send(app(&ctx), Method::POST, "/api/v1/users", None, Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errno"], 422);
        assert_eq!(body["data"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_story_lifecycle() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("Alice", "alice@example.com").await;

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            "/api/v1/stories",
            Some(alice),
            Some(json!({
                "title": "Summer at the lake",
                "is_range": true,
                "start_year": 1985,
                "start_month": "June",
                "start_day": "1",
                "end_year": "1985",
                "end_month": "July",
                "end_day": 3
            })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["date_as_text"], "June 1st - July 3rd, 1985");
        let story_id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &format!("/api/v1/stories/{}", story_id),
            Some(alice),
            Some(json!({ "end_year": "1984" })),
        )
        .await;
        assert_eq!(body["errno"], 422);
        assert_eq!(body["data"][0]["field"], "end_year");

        let (_, body) = send(
            app(&ctx),
            Method::GET,
            &format!("/api/v1/stories/{}", story_id),
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["end_year"], "1985");

        let (_, body) = send(
            app(&ctx),
            Method::GET,
            "/api/v1/stories?scope=draft",
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(
            app(&ctx),
            Method::GET,
            "/api/v1/stories?scope=secret",
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["errno"], 400);

        let (_, body) = send(
            app(&ctx),
            Method::DELETE,
            &format!("/api/v1/stories/{}", story_id),
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["errno"], 0);

        let (_, body) = send(
            app(&ctx),
            Method::GET,
            &format!("/api/v1/stories/{}", story_id),
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_null_date_field_clears_value() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("Alice", "alice@example.com").await;

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            "/api/v1/stories",
            Some(alice),
            Some(json!({
                "title": "Wedding",
                "start_year": 1985,
                "start_month": "June",
                "start_day": 1
            })),
        )
        .await;
        assert_eq!(body["data"]["date_as_text"], "June 1st, 1985");
        let uri = format!("/api/v1/stories/{}", body["data"]["id"].as_str().unwrap());

        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &uri,
            Some(alice),
            Some(json!({ "start_day": null })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert!(body["data"]["start_day"].is_null());
        assert_eq!(body["data"]["date_as_text"], "June 1985");

        // 未提交的字段保持原值
        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &uri,
            Some(alice),
            Some(json!({ "title": "Our wedding" })),
        )
        .await;
        assert_eq!(body["data"]["start_month"], "June");
        assert_eq!(body["data"]["date_as_text"], "June 1985");
    }

    #[tokio::test]
    async fn test_sections_and_contributors() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("Alice", "alice@example.com").await;
        let bob = ctx.create_user("Bob", "bob@example.com").await;
        let family = ctx.create_family(alice, "The Smiths").await;
        ctx.add_member(family, bob).await;

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            "/api/v1/stories",
            Some(alice),
            Some(json!({ "title": "Grandpa's farm", "start_year": "1962" })),
        )
        .await;
        let story_id = body["data"]["id"].as_str().unwrap().to_string();

        // 未发布前其他成员看不到
        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &format!("/api/v1/stories/{}/sections", story_id),
            Some(bob),
            Some(json!({ "body": "I remember the tractor." })),
        )
        .await;
        assert_eq!(body["errno"], 403);

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &format!("/api/v1/stories/{}/publications", story_id),
            Some(alice),
            Some(json!({ "family_id": family })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["published"], true);

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &format!("/api/v1/stories/{}/sections", story_id),
            Some(bob),
            Some(json!({ "body": "I remember the tractor." })),
        )
        .await;
        assert_eq!(body["errno"], 0);

        let (_, body) = send(
            app(&ctx),
            Method::DELETE,
            &format!("/api/v1/stories/{}/contributors/{}", story_id, bob),
            Some(alice),
            None,
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["removed_sections"], 1);
    }

    #[tokio::test]
    async fn test_update_kinship_role() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user("Alice", "alice@example.com").await;
        let relative = ctx.create_user("Bob", "bob@example.com").await;
        let cousin = ctx.create_user("Carol", "carol@example.com").await;
        let family = ctx.create_family(admin, "The Smiths").await;
        let kinship_id = ctx.add_member(family, relative).await;
        ctx.add_member(family, cousin).await;
        let uri = format!("/api/v1/kinships/{}/role", kinship_id);

        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &uri,
            Some(admin),
            Some(json!({ "kinship": { "role": "co_admin" } })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["role"], "co_admin");
        assert_eq!(ctx.mailer.sent().len(), 1);

        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &uri,
            Some(admin),
            Some(json!({ "kinship": { "role": "admin" } })),
        )
        .await;
        assert_eq!(body["errno"], 422);
        assert_eq!(body["data"][0]["field"], "role");
        assert_eq!(body["data"][0]["message"], "is not included in the list");

        let (_, body) = send(
            app(&ctx),
            Method::PATCH,
            &uri,
            Some(cousin),
            Some(json!({ "kinship": { "role": "guest" } })),
        )
        .await;
        assert_eq!(body["errno"], 403);
    }

    #[tokio::test]
    async fn test_invite_and_resend() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user("Alice", "alice@example.com").await;
        let carol = ctx.create_user("Carol", "carol@example.com").await;
        let outsider = ctx.create_user("Dave", "dave@example.com").await;
        let family = ctx.create_family(admin, "The Smiths").await;

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &format!("/api/v1/families/{}/invitations", family),
            Some(admin),
            Some(json!({
                "users": [
                    { "id": carol, "role": "member" },
                    { "email": "not-an-email", "role": "member" }
                ],
                "message": "Join us"
            })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["valid"], json!(["carol@example.com"]));
        assert_eq!(body["data"]["invalid"].as_array().unwrap().len(), 1);

        let invitation = ctx
            .invitation_repo
            .find_by_recipient(FamilyId::from_uuid(family), carol)
            .await
            .unwrap()
            .unwrap();
        ctx.mailer.clear();

        let resend_uri = format!("/api/v1/families/{}/invitations/resend", family);
        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &resend_uri,
            Some(admin),
            Some(json!({ "ids": [invitation.id()] })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["resent"], json!(["carol@example.com"]));
        assert_eq!(ctx.mailer.sent().len(), 1);

        let (_, body) = send(
            app(&ctx),
            Method::POST,
            &resend_uri,
            Some(outsider),
            Some(json!({ "ids": [invitation.id()] })),
        )
        .await;
        assert_eq!(body["errno"], 403);
    }
}
