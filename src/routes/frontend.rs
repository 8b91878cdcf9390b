//! 前端页面
//!
//! 构建产物通过 rust-embed 编译进二进制；`frontend-custom/` 目录中的同名文件优先，
//! 便于部署时替换页面而不重新编译。未知的非 API 路径回退到 index.html。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const CUSTOM_DIR: &str = "./frontend-custom";

fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 资源文件可长期缓存，页面本身不缓存
fn should_cache(path: &str) -> bool {
    path.starts_with("assets/")
        || matches!(
            Path::new(path).extension().and_then(|s| s.to_str()),
            Some("js" | "css" | "woff2" | "png" | "jpg" | "jpeg" | "svg" | "webp")
        )
}

/// 只接受相对路径中的普通段
fn is_safe_path(path: &str) -> bool {
    !path.contains('\\')
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// 页面中的 %SYSTEM_NAME% 替换为配置的站点名称
fn render_html(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", &config.app.system_name)
        .into_bytes()
}

fn get_file(path: &str) -> Option<Vec<u8>> {
    std::fs::read(Path::new(CUSTOM_DIR).join(path))
        .ok()
        .or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    // 未匹配的 API 路径返回 JSON，而不是页面
    if path == "api" || path.starts_with("api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "API endpoint not found",
        )));
    }

    let (content, file_path) = if path.is_empty() || !is_safe_path(path) {
        (get_file("index.html"), "index.html")
    } else if let Some(content) = get_file(path) {
        (Some(content), path)
    } else {
        (get_file("index.html"), "index.html")
    };

    let Some(mut data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(format!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head>\
                 <body><h1>Frontend Not Found</h1>\
                 <p>The frontend assets have not been embedded into this build.</p></body></html>",
                AppConfig::get().app.system_name
            )));
    };

    let mime = get_mime_type(file_path);
    if mime.starts_with("text/html") {
        data = render_html(&data, AppConfig::get());
    }

    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if should_cache(file_path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    } else {
        response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
    }
    Ok(response.body(data))
}

/// 必须最后注册，兜底所有未匹配的 GET 请求
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("app.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("assets/app.js"));
        assert!(should_cache("logo.png"));
        assert!(!should_cache("index.html"));
    }

    #[test]
    fn test_safe_path() {
        assert!(is_safe_path("assets/app.js"));
        assert!(!is_safe_path("../Cargo.toml"));
        assert!(!is_safe_path("assets//x"));
        assert!(!is_safe_path("a\\b"));
    }

    #[test]
    fn test_render_html_uses_system_name() {
        let config = AppConfig::get();
        let html = render_html(b"<title>%SYSTEM_NAME%</title>", config);
        assert_eq!(
            String::from_utf8(html).unwrap(),
            format!("<title>{}</title>", config.app.system_name)
        );
    }

    #[actix_web::test]
    async fn test_spa_fallback_and_unknown_api() {
        let app = actix_test::init_service(App::new().configure(configure_frontend_routes)).await;

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/students/12").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/nothing").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
