//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod family_repo;
mod invitation_repo;
mod story_repo;
mod user_repo;

pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use family_repo::*;
pub use invitation_repo::*;
pub use story_repo::*;
pub use user_repo::*;
