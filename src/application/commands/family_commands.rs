//! Family Commands - 家庭、邀请与成员角色

use uuid::Uuid;

/// 创建家庭命令，创建者成为 admin
#[derive(Debug, Clone)]
pub struct CreateFamily {
    pub user_id: Uuid,
    pub name: String,
    pub personal_access: bool,
}

/// 单个受邀者参数：已注册用户给 id，否则给 email
#[derive(Debug, Clone, Default)]
pub struct InviteeParams {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// 批量邀请命令
#[derive(Debug, Clone)]
pub struct CreateInvitations {
    pub family_id: Uuid,
    pub sender_id: Uuid,
    pub users: Vec<InviteeParams>,
    pub message: Option<String>,
}

/// 重发邀请命令
#[derive(Debug, Clone)]
pub struct ResendInvitations {
    pub family_id: Uuid,
    pub user_id: Uuid,
    pub ids: Vec<Uuid>,
}

/// 修改成员角色命令
#[derive(Debug, Clone)]
pub struct UpdateKinshipRole {
    pub kinship_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}
