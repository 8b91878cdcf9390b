//! 数据模型定义
//!
//! - `entities`: 业务实体
//! - `requests`: 请求参数
//! - `responses`: 响应结构

pub mod auth;
pub mod common;
pub mod materials;
pub mod students;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 进程启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 认证，3xxx 文件，4xxx 资料，5xxx 学生，6xxx 用户。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    InternalServerError = 1005,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,
    PasswordPolicyViolation = 2004,
    RateLimitExceeded = 2029,

    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,
    FileDeleteFailed = 3005,

    MaterialNotFound = 4000,
    MaterialCreationFailed = 4001,
    MaterialUpdateFailed = 4002,
    MaterialDeleteFailed = 4003,
    MaterialInvalidCategory = 4004,

    StudentNotFound = 5000,
    StudentCreationFailed = 5001,
    StudentUpdateFailed = 5002,
    StudentDeleteFailed = 5003,

    UserNotFound = 6000,
    UserUpdateFailed = 6001,
}
