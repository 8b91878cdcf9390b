/*!
 * 速率限制中间件
 *
 * 按固定时间窗口计数，用于限制登录等敏感端点的请求频率。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())  // 5次/分钟
 *     .route(web::post().to(login))
 * ```
 *
 * - 已认证请求按用户 ID 计数，否则按客户端 IP 计数
 * - 超过限制返回 429，并带 `Retry-After` 头
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ErrorCode, users::entities::User};

use super::create_error_response;

/// 全局计数缓存，键中带窗口编号，过期的窗口自然淘汰
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

/// 允许的最长窗口
const MAX_WINDOW_SECS: u64 = 3600;

#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 区分不同端点的键前缀
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 管理员上传：30次/分钟/用户
    pub fn upload() -> Self {
        Self::new(30, 60).with_prefix("upload")
    }

    /// 当前窗口编号及其剩余秒数
    fn window_at(&self, now_secs: u64) -> (u64, u64) {
        let index = now_secs / self.window_secs;
        let remaining = self.window_secs - now_secs % self.window_secs;
        (index, remaining)
    }

    fn cache_key(&self, identifier: &str, window: u64) -> String {
        if self.key_prefix.is_empty() {
            format!("{identifier}:{window}")
        } else {
            format!("{}:{identifier}:{window}", self.key_prefix)
        }
    }
}

/// 提取客户端 IP
///
/// 部署在反向代理之后时，`realip_remote_addr` 会采用代理设置的转发头；
/// 直接暴露在不可信网络时，转发头可被伪造。
fn extract_client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| {
            // 去掉端口部分
            addr.parse::<std::net::SocketAddr>()
                .map(|sock| sock.ip().to_string())
                .unwrap_or_else(|_| addr.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limit_response(retry_after: u64) -> HttpResponse {
    let mut response = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Too many requests, please try again later",
    );
    response.headers_mut().insert(
        actix_web::http::header::RETRY_AFTER,
        actix_web::http::header::HeaderValue::from(retry_after),
    );
    response
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            // connection_info() 需要可变借用 extensions，先释放只读借用
            let user_id = req.extensions().get::<User>().map(|user| user.id);
            let identifier = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", extract_client_ip(&req)),
            };

            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window, retry_after) = limit.window_at(now);
            let cache_key = limit.cache_key(&identifier, window);

            let current = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);
            if current >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} ({}/{})",
                    cache_key, current, limit.max_requests
                );
                return Ok(
                    req.into_response(rate_limit_response(retry_after).map_into_right_body())
                );
            }

            RATE_LIMIT_CACHE.insert(cache_key, current + 1).await;

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
