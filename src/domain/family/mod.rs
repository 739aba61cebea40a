//! Family Context - 家庭限界上下文
//!
//! 职责:
//! - 家庭聚合管理
//! - 成员关系与角色
//! - 邀请

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Family;
pub use entities::{Invitation, Kinship};
pub use errors::FamilyError;
pub use value_objects::{Email, FamilyId, KinshipRole};
