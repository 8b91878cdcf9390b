use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::entities::StudentFileKind};
use crate::services::{file_download_response, get_upload_store};

pub async fn handle_download_student_file(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    kind: StudentFileKind,
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

    let Some(attached) = student.attachment(kind) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            format!("Student has no {} file", kind.form_field()),
        )));
    };

    let store = get_upload_store(request);
    Ok(file_download_response(
        &store,
        &attached.stored_name,
        &attached.file_name,
    ))
}
