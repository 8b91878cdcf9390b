use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::get_upload_store;

pub async fn handle_delete_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to get student {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to get student",
                )),
            );
        }
    };

    // 先删附件再删记录，缺失的附件忽略
    let store = get_upload_store(request);
    for stored_name in student.stored_files() {
        match store.remove(stored_name) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                "Attachment {} of student {} was already missing",
                stored_name,
                id
            ),
            Err(e) => {
                tracing::error!("Failed to delete attachment of student {}: {}", id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::FileDeleteFailed,
                        "Failed to delete student files",
                    )),
                );
            }
        }
    }

    match storage.delete_student(id).await {
        Ok(_) => {
            tracing::info!("Student {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
        }
        Err(e) => {
            tracing::error!("Failed to delete student {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::StudentDeleteFailed,
                    "Failed to delete student",
                )),
            )
        }
    }
}
