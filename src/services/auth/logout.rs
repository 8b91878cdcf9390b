use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::{cached_user_key, revoked_token_key};
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 注销
///
/// 当前 access token 在剩余有效期内被列入注销名单，同时清除 refresh cookie。
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let Some(token) = JwtUtils::extract_bearer_token(request)
        && let Ok(claims) = JwtUtils::verify_access_token(&token)
    {
        let remaining = claims.remaining_secs().max(1);
        cache
            .insert_raw(revoked_token_key(&token), claims.sub.clone(), remaining)
            .await;
        cache.remove(&cached_user_key(&token)).await;
        tracing::info!("User {} logged out", claims.sub);
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully")))
}
