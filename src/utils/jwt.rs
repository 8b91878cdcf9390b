//! access / refresh token 的签发与校验
//!
//! access token 走 `Authorization: Bearer`，refresh token 只放在 http-only cookie 中，
//! 且 cookie 路径限制在认证接口下。

use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, http::header::AUTHORIZATION};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: String,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    /// 距离过期的剩余秒数
    pub fn remaining_secs(&self) -> u64 {
        let now = chrono::Utc::now().timestamp().max(0) as usize;
        self.exp.saturating_sub(now) as u64
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn issue(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        lifetime: chrono::Duration,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + lifetime).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };
        let key = EncodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        encode(&Header::default(), &claims, &key)
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;
        if claims.token_type != expected {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::issue(
            user_id,
            role,
            TokenKind::Access,
            chrono::Duration::minutes(minutes),
        )
    }

    /// `refresh_lifetime` 为空时使用配置中的默认天数
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_lifetime: Option<chrono::Duration>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_lifetime = refresh_lifetime.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::issue(user_id, role, TokenKind::Refresh, refresh_lifetime)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    fn refresh_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path(REFRESH_COOKIE_PATH)
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        lifetime: chrono::Duration,
    ) -> Cookie<'static> {
        Self::refresh_cookie(
            refresh_token.to_string(),
            CookieDuration::seconds(lifetime.num_seconds()),
        )
    }

    /// 立即过期的空 cookie，用于注销
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), CookieDuration::ZERO)
    }

    pub fn extract_refresh_token_from_cookie(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
