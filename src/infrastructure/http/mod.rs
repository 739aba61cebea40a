//! HTTP Layer - RESTful JSON API
//!
//! 所有业务响应都是 HTTP 200 + `{errno, error, data}`，只有身份缺失时返回 401

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use extract::CurrentUser;
pub use routes::create_routes;
pub use server::{build_app, HttpServer, ServerConfig};
pub use state::AppState;
