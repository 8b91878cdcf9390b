use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::StudentListParams;
use crate::services::StudentService;
use crate::utils::{SafeIDI64, SafeStudentFileKind};

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_students(&req, query.into_inner().into())
        .await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, id.0).await
}

pub async fn download_student_file(
    req: HttpRequest,
    id: SafeIDI64,
    kind: SafeStudentFileKind,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.download_file(&req, id.0, kind.0).await
}

pub async fn create_student(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(&req, payload).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.update_student(&req, id.0, payload).await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, id.0).await
}

// 公开路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .route("", web::get().to(list_students))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}/files/{kind}", web::get().to(download_student_file)),
    );
}

// 管理员路由，挂在 /api/v1/admin 之下
pub fn configure_admin_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/students")
            .wrap(middlewares::RateLimit::upload())
            .route(web::post().to(create_student)),
    )
    .service(
        web::resource("/students/{id}")
            .wrap(middlewares::RateLimit::upload())
            .route(web::put().to(update_student))
            .route(web::delete().to(delete_student)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    use crate::models::users::entities::UserRole;
    use crate::utils::testing::{MultipartBody, PDF_BYTES, PNG_BYTES, TestContext, init_test_app};

    fn admin_request(method: test::TestRequest, uri: &str, token: &str) -> test::TestRequest {
        method
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {token}")))
    }

    #[actix_web::test]
    async fn test_create_with_name_only() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        let body = MultipartBody::new().text("name", "Ayesha Khan");
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["student"]["name"], "Ayesha Khan");
        assert!(body["data"]["student"]["profile_picture"].is_null());
        assert!(body["data"]["student"]["resume"].is_null());

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/students?search=ayesha")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pagination"]["total"], 1);
    }

    #[actix_web::test]
    async fn test_create_requires_name() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        let body = MultipartBody::new()
            .text("skills", "Rust")
            .file("profile_picture", "me.png", "image/png", PNG_BYTES);
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.stored_file_count(), 0);
    }

    #[actix_web::test]
    async fn test_wrong_file_type_for_field() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        // 头像字段只接受图片
        let body = MultipartBody::new()
            .text("name", "Bilal")
            .file("profile_picture", "cv.pdf", "application/pdf", PDF_BYTES);
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 3002);
        assert_eq!(ctx.stored_file_count(), 0);
    }

    #[actix_web::test]
    async fn test_profile_lifecycle() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        // 带头像和简历创建
        let body = MultipartBody::new()
            .text("name", "Chen Wei")
            .text("description", "Final year student")
            .text("skills", "Rust, SQL")
            .file("profile_picture", "chen.png", "image/png", PNG_BYTES)
            .file("resume", "chen cv.pdf", "application/pdf", PDF_BYTES);
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["student"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["student"]["resume"]["file_name"], "chen_cv.pdf");
        assert_eq!(ctx.stored_file_count(), 2);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/students/{id}/files/resume"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        let bytes = test::read_body(resp).await;
        assert_eq!(&bytes[..], PDF_BYTES);

        // 替换简历并清空简介，旧文件随之删除
        let body = MultipartBody::new()
            .text("description", "")
            .file("resume", "new.pdf", "application/pdf", PDF_BYTES);
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::put(),
                &format!("/api/v1/admin/students/{id}"),
                &token,
            ))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["student"]["name"], "Chen Wei");
        assert!(body["data"]["student"]["description"].is_null());
        assert_eq!(body["data"]["student"]["skills"], "Rust, SQL");
        assert_eq!(body["data"]["student"]["resume"]["file_name"], "new.pdf");
        assert_eq!(ctx.stored_file_count(), 2);

        // 删除档案及附件
        let resp = test::call_service(
            &app,
            admin_request(
                test::TestRequest::delete(),
                &format!("/api/v1/admin/students/{id}"),
                &token,
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ctx.stored_file_count(), 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/students/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_missing_attachment_and_bad_kind() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        let body = MultipartBody::new().text("name", "Dana");
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["student"]["id"].as_i64().unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/students/{id}/files/profile"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/students/{id}/files/avatar"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            admin_request(test::TestRequest::delete(), "/api/v1/admin/students/999", &token)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_admin_can_delete_student() {
        let ctx = TestContext::new().await;
        let token = ctx.token_for("admin", UserRole::Admin).await;
        let app = init_test_app!(ctx);

        let body = MultipartBody::new().text("name", "Elif");
        let resp = test::call_service(
            &app,
            body.into_request(admin_request(
                test::TestRequest::post(),
                "/api/v1/admin/students",
                &token,
            ))
            .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["student"]["id"].as_i64().unwrap();

        let delete = || {
            admin_request(
                test::TestRequest::delete(),
                &format!("/api/v1/admin/students/{id}"),
                &token,
            )
            .to_request()
        };
        let resp = test::call_service(&app, delete()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);

        let resp = test::call_service(&app, delete()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
