use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt;
use crate::utils::password::{hash_password, verify_password};

use super::AuthService;

// 用户不存在和密码错误返回同一条消息
const LOGIN_FAILED: &str = "Username or password is incorrect";

/// 用户不存在时也做一次哈希校验，使两种失败的耗时一致
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("ananas-placeholder-password").ok());

fn verify_against_dummy(password: &str) -> bool {
    DUMMY_HASH
        .as_deref()
        .is_some_and(|hash| verify_password(password, hash))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let username = login_request.username.trim();
    if username.is_empty() || login_request.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Username and password are required",
        )));
    }

    let user = match storage.get_user_by_username(username).await {
        Ok(Some(user)) if verify_password(&login_request.password, &user.password_hash) => user,
        Ok(found) => {
            if found.is_none() {
                verify_against_dummy(&login_request.password);
            }
            tracing::info!("Failed login attempt for user {}", username);
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::AuthFailed, LOGIN_FAILED)));
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, please try again later",
                )),
            );
        }
    };

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to record last login for user {}: {}", user.id, e);
    }

    // 记住我时延长 refresh token 有效期
    let refresh_lifetime = if login_request.remember_me {
        chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry)
    } else {
        chrono::Duration::days(config.jwt.refresh_token_expiry)
    };

    match user.generate_token_pair(Some(refresh_lifetime)) {
        Ok(token_pair) => {
            tracing::info!("User {} logged in successfully", user.username);

            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60,
                user,
                created_at: chrono::Utc::now(),
            };

            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_lifetime);

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
