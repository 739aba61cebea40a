//! HTTP Handlers

mod family;
mod ping;
mod story;
mod user;

pub use family::*;
pub use ping::*;
pub use story::*;
pub use user::*;
