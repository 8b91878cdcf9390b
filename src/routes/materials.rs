use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::materials::requests::{MaterialListParams, UpdateMaterialRequest};
use crate::services::MaterialService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MaterialService 实例
static MATERIAL_SERVICE: Lazy<MaterialService> = Lazy::new(MaterialService::new_lazy);

pub async fn overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.overview(&req).await
}

pub async fn list_materials(
    req: HttpRequest,
    query: web::Query<MaterialListParams>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE
        .list_materials(&req, query.into_inner().into())
        .await
}

pub async fn get_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.get_material(&req, id.0).await
}

pub async fn download_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.download_material(&req, id.0).await
}

pub async fn create_material(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.create_material(&req, payload).await
}

pub async fn update_material(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateMaterialRequest>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE
        .update_material(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.delete_material(&req, id.0).await
}

// 公开路由
pub fn configure_materials_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/materials")
            .route("", web::get().to(list_materials))
            .route("/overview", web::get().to(overview))
            .route("/{id}", web::get().to(get_material))
            .route("/{id}/download", web::get().to(download_material)),
    );
}

// 管理员路由，挂在 /api/v1/admin 之下
pub fn configure_admin_material_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/materials")
            .wrap(middlewares::RateLimit::upload())
            .route(web::post().to(create_material)),
    )
    .route("/materials/{id}", web::put().to(update_material))
    .route("/materials/{id}", web::delete().to(delete_material));
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::models::users::entities::UserRole;
    use crate::utils::testing::{MultipartBody, PDF_BYTES, TestContext, init_test_app};

    fn upload_body(title: &str, category: &str) -> MultipartBody {
        MultipartBody::new()
            .text("title", title)
            .text("category", category)
            .text("description", "Chapter one")
            .file("file", "Week 1 notes.pdf", "application/pdf", PDF_BYTES)
    }

    fn upload_request(token: &str, body: MultipartBody) -> actix_web::test::TestRequest {
        body.into_request(
            test::TestRequest::post()
                .uri("/api/v1/admin/materials")
                .insert_header(("Authorization", format!("Bearer {token}"))),
        )
    }

    #[actix_web::test]
    async fn test_public_listing_is_open() {
        let ctx = TestContext::new().await;
        let app = init_test_app!(ctx);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/materials/overview").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["notes"], json!([]));
        assert_eq!(body["data"]["exercises"], json!([]));
        assert_eq!(body["data"]["exams"], json!([]));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/materials?page=1&size=5&category=exam")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_admin_routes_require_admin() {
        let ctx = TestContext::new().await;
        let user_token = ctx.token_for("student", UserRole::User).await;
        let app = init_test_app!(ctx);

        let anonymous = upload_body("Week 1", "notes").into_request(
            test::TestRequest::post().uri("/api/v1/admin/materials"),
        );
        let resp = test::call_service(&app, anonymous.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            upload_request(&user_token, upload_body("Week 1", "notes")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/v1/admin/materials/1")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ctx.stored_file_count(), 0);
    }

    #[actix_web::test]
    async fn test_upload_download_update_delete() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        // 上传
        let resp = test::call_service(
            &app,
            upload_request(&token, upload_body("Week 1", "notes")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["material"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["material"]["file_name"], "Week_1_notes.pdf");
        assert_eq!(body["data"]["material"]["category"], "notes");
        assert!(body["data"]["material"].get("stored_name").is_none());
        assert_eq!(ctx.stored_file_count(), 1);

        // 首页分组
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/materials/overview").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["notes"][0]["id"], id);

        // 下载
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/materials/{id}/download"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("Week_1_notes.pdf"));
        let bytes = test::read_body(resp).await;
        assert_eq!(&bytes[..], PDF_BYTES);

        // 修改
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/admin/materials/{id}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(json!({ "title": "Week 1 (revised)", "category": "exercise" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["material"]["title"], "Week 1 (revised)");
        assert_eq!(body["data"]["material"]["category"], "exercise");

        // 删除后文件和记录都不存在
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/materials/{id}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ctx.stored_file_count(), 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/materials/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_upload_validation() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        // 缺少标题
        let missing = MultipartBody::new()
            .text("category", "notes")
            .file("file", "a.pdf", "application/pdf", PDF_BYTES);
        let resp = test::call_service(&app, upload_request(&token, missing).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Please fill in all required fields");

        // 未知类别
        let resp = test::call_service(
            &app,
            upload_request(&token, upload_body("Week 1", "homework")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4004);

        // 扩展名伪装
        let fake = MultipartBody::new()
            .text("title", "Fake")
            .text("category", "notes")
            .file("file", "fake.pdf", "application/pdf", b"MZ\x90\x00 this is not a pdf at all");
        let resp = test::call_service(&app, upload_request(&token, fake).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 3002);

        assert_eq!(ctx.stored_file_count(), 0);
    }

    #[actix_web::test]
    async fn test_missing_file_on_disk_is_404() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        let resp = test::call_service(
            &app,
            upload_request(&token, upload_body("Week 2", "notes")).to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["material"]["id"].as_i64().unwrap();

        for entry in std::fs::read_dir(ctx.uploads.root()).unwrap() {
            std::fs::remove_file(entry.unwrap().path()).unwrap();
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/materials/{id}/download"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // 文件缺失时仍可删除记录
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/materials/{id}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_invalid_id_is_bad_request() {
        let ctx = TestContext::new().await;
        let app = init_test_app!(ctx);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/materials/abc").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
