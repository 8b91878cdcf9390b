pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;
pub mod security_headers;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;
pub use security_headers::security_headers;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

// 中间件统一的 JSON 错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

/// 已注销 access token 的缓存键
pub(crate) fn revoked_token_key(token: &str) -> String {
    format!("revoked:{token}")
}

/// 已认证用户的缓存键
pub(crate) fn cached_user_key(token: &str) -> String {
    format!("user:{token}")
}

/// 用户最近一次改密时间（unix 秒）的缓存键
pub(crate) fn password_changed_key(user_id: i64) -> String {
    format!("password_changed:{user_id}")
}
