use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/system").route("/health", web::get().to(health)));
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    use crate::utils::testing::{TestContext, init_test_app};

    #[actix_web::test]
    async fn test_health_is_public() {
        let ctx = TestContext::new().await;
        let app = init_test_app!(ctx);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/system/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["data"]["uptime_seconds"].as_i64().unwrap() >= 0);
    }

    #[actix_web::test]
    async fn test_security_headers_on_every_response() {
        let ctx = TestContext::new().await;
        let app = init_test_app!(ctx);

        // 成功响应和中间件拒绝的响应都要带安全头
        for (uri, status) in [
            ("/api/v1/system/health", StatusCode::OK),
            ("/api/v1/admin/students/1", StatusCode::UNAUTHORIZED),
        ] {
            let req = if status == StatusCode::OK {
                test::TestRequest::get()
            } else {
                test::TestRequest::delete()
            };
            let resp = test::call_service(&app, req.uri(uri).to_request()).await;
            assert_eq!(resp.status(), status);
            let headers = resp.headers();
            assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
            assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
            assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
        }
    }
}
