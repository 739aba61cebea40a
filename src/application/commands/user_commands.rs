//! User Commands

/// 注册用户命令
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}
