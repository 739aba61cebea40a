//! HTTP Middleware
//!
//! 记录非 2xx 响应

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use super::extract::USER_ID_HEADER;

/// 传输层失败的分类
///
/// 业务错误走 HTTP 200 + errno，已在 `ApiError::into_response` 里记录，不会出现在这里
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// 缺少或无法识别 `X-User-Id`，客户端常见情况，只记 debug
    Unauthorized,
    /// 请求体超过上限
    PayloadTooLarge,
    /// 路由或方法不存在
    NoRoute,
    /// 其他 4xx，多是 JSON 解析失败
    BadRequest,
    Server,
}

impl TransportFailure {
    pub fn classify(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::UNAUTHORIZED => Some(Self::Unauthorized),
            StatusCode::PAYLOAD_TOO_LARGE => Some(Self::PayloadTooLarge),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => Some(Self::NoRoute),
            s if s.is_server_error() => Some(Self::Server),
            s if s.is_client_error() => Some(Self::BadRequest),
            _ => None,
        }
    }
}

pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let has_user = request.headers().contains_key(USER_ID_HEADER);
    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let response = next.run(request).await;
    let status = response.status().as_u16();

    match TransportFailure::classify(response.status()) {
        Some(TransportFailure::Unauthorized) => {
            tracing::debug!(method = %method, uri = %uri, has_user, "Unauthenticated request");
        }
        Some(TransportFailure::PayloadTooLarge) => {
            tracing::warn!(method = %method, uri = %uri, ?content_length, "Request body too large");
        }
        Some(TransportFailure::NoRoute) => {
            tracing::debug!(method = %method, uri = %uri, status, "No such route");
        }
        Some(TransportFailure::BadRequest) => {
            tracing::warn!(method = %method, uri = %uri, status, "HTTP client error");
        }
        Some(TransportFailure::Server) => {
            tracing::error!(method = %method, uri = %uri, status, "HTTP server error");
        }
        None => {}
    }

    response
}
