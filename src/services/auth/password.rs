use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::{RequireJWT, cached_user_key, password_changed_key};
use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::{ApiResponse, ErrorCode, auth::ChangePasswordRequest};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    // 缓存中的用户不含密码哈希，需从数据库读取
    let stored = match storage.get_user_by_id(user.id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to load user {}: {}", user.id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to change password",
                )),
            );
        }
    };

    if !verify_password(&change_request.old_password, &stored.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    if let Err(policy) = validate_password(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            policy.to_string(),
        )));
    }

    let hashed = match hash_password(&change_request.new_password) {
        Ok(hashed) => hashed,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to change password",
                )),
            );
        }
    };

    match storage.update_password(stored.id, &hashed).await {
        Ok(true) => {
            tracing::info!("User {} changed password", stored.username);
            Ok(start_fresh_session(service, request, &stored).await)
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => {
            tracing::error!("Failed to update password for user {}: {}", stored.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    "Failed to change password",
                )),
            )
        }
    }
}

/// 作废改密之前签发的全部 token，并为当前客户端签发新的 token 对
async fn start_fresh_session(
    service: &AuthService,
    request: &HttpRequest,
    user: &crate::models::users::entities::User,
) -> HttpResponse {
    let config = service.get_config();
    let cache = service.get_cache(request);

    // 旧 access token 最长还能存活 access_token_expiry 分钟
    let now = chrono::Utc::now().timestamp().max(0);
    cache
        .insert_raw(
            password_changed_key(user.id),
            now.to_string(),
            (config.jwt.access_token_expiry.max(1) * 60) as u64,
        )
        .await;
    if let Some(token) = JwtUtils::extract_bearer_token(request) {
        cache.remove(&cached_user_key(&token)).await;
    }

    let refresh_lifetime = chrono::Duration::days(config.jwt.refresh_token_expiry);
    match user.generate_token_pair(Some(refresh_lifetime)) {
        Ok(pair) => HttpResponse::Ok()
            .cookie(JwtUtils::create_refresh_token_cookie(
                &pair.refresh_token,
                refresh_lifetime,
            ))
            .json(ApiResponse::success(
                RefreshTokenResponse {
                    access_token: pair.access_token,
                    expires_in: config.jwt.access_token_expiry * 60,
                },
                "Password changed successfully",
            )),
        Err(e) => {
            // 密码已更新，只是无法续签，客户端需重新登录
            tracing::error!("Failed to issue tokens after password change: {}", e);
            HttpResponse::Ok()
                .cookie(JwtUtils::create_empty_refresh_token_cookie())
                .json(ApiResponse::success_empty(
                    "Password changed successfully, please login again",
                ))
        }
    }
}
