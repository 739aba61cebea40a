//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod family_handlers;
mod invitation_handlers;
mod story_handlers;
mod user_handlers;

pub use family_handlers::*;
pub use invitation_handlers::*;
pub use story_handlers::*;
pub use user_handlers::*;
