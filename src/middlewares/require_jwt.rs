/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>` 中的 access token，
 * 通过后把当前用户放入请求扩展，供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/admin")
 *         .wrap(RequireJWT)
 *         .route("/materials", web::post().to(create_material)),
 * );
 *
 * async fn create_material(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user_id = RequireJWT::extract_user_id(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取 Bearer token，缺失则 401
 * 2. 已注销的 token（缓存中存在 `revoked:<token>`）直接拒绝
 * 3. 校验签名、过期时间和 token 类型
 * 4. 优先从缓存读取用户，未命中时查库并回写缓存
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::{ErrorCode, users::entities};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::{cached_user_key, create_error_response, password_changed_key, revoked_token_key};

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthFailure {
    MissingToken,
    Revoked,
    InvalidToken,
    UnknownUser,
    StorageUnavailable,
}

impl AuthFailure {
    fn message(self) -> &'static str {
        match self {
            AuthFailure::MissingToken => "Missing or invalid Authorization header",
            AuthFailure::Revoked => "Token has been revoked",
            AuthFailure::InvalidToken => "Invalid or expired token",
            AuthFailure::UnknownUser => "User no longer exists",
            AuthFailure::StorageUnavailable => "Failed to load user",
        }
    }

    fn into_response(self) -> HttpResponse {
        if self == AuthFailure::StorageUnavailable {
            return create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                self.message(),
            );
        }
        create_error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            &format!("Unauthorized: {}", self.message()),
        )
    }
}

/// 解析 access token 并得到当前用户
async fn authenticate(req: &ServiceRequest) -> Result<entities::User, AuthFailure> {
    let token = JwtUtils::extract_bearer_token(req.request()).ok_or(AuthFailure::MissingToken)?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    if cache.get_raw(&revoked_token_key(&token)).await.found().is_some() {
        return Err(AuthFailure::Revoked);
    }

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        debug!("Access token rejected: {}", err);
        AuthFailure::InvalidToken
    })?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthFailure::InvalidToken)?;

    // 改密之前签发的 token 一律失效
    if let CacheResult::Found(changed) = cache.get_raw(&password_changed_key(user_id)).await
        && changed
            .parse::<usize>()
            .is_ok_and(|changed| claims.iat < changed)
    {
        return Err(AuthFailure::Revoked);
    }

    let user_key = cached_user_key(&token);
    if let CacheResult::Found(json) = cache.get_raw(&user_key).await {
        match serde_json::from_str::<entities::User>(&json) {
            Ok(user) if user.id == user_id => return Ok(user),
            _ => cache.remove(&user_key).await,
        }
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {} for authentication: {}", user_id, e);
            AuthFailure::StorageUnavailable
        })?
        .ok_or(AuthFailure::UnknownUser)?;

    if user.token_predates_password_change(claims.iat) {
        return Err(AuthFailure::Revoked);
    }

    // 缓存时间不超过 token 剩余有效期
    let ttl = AppConfig::get()
        .cache
        .default_ttl
        .min(claims.remaining_secs())
        .max(1);
    if let Ok(user_json) = serde_json::to_string(&user) {
        cache.insert_raw(user_key, user_json, ttl).await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // CORS 预检请求不携带凭证
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(
                    req.into_response(HttpResponse::NoContent().finish().map_into_right_body())
                );
            }

            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(failure) => {
                    info!("Rejected request to {}: {}", req.path(), failure.message());
                    Ok(req.into_response(failure.into_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，仅在 RequireJWT 之后可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }
}
