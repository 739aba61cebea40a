//! Story Context - 故事限界上下文
//!
//! 职责:
//! - 故事聚合管理（段落、发布、时间胶囊）
//! - 故事日期的校验与文本生成

mod aggregate;
mod date_composer;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{Story, StoryParts};
pub use date_composer::{
    is_blank, month_index, ordinalize, parse_int, DateField, DateRangeError, DateSpec,
    StoryDateComposer,
};
pub use entities::{Publication, Section};
pub use errors::StoryError;
pub use value_objects::{normalize_tags, PublicationPrivacy, StoryId};
