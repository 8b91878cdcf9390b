use super::entities::UserRole;

// 创建用户（存储层使用，password 已是哈希值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}
