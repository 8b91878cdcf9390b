use actix_web::middleware::DefaultHeaders;

/// 所有响应都附带的安全响应头
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("X-XSS-Protection", "1; mode=block"))
}
