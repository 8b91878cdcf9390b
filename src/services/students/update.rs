use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{STUDENT_FILE_FIELDS, StudentService};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::UpdateStudentRequest, responses::StudentResponse},
};
use crate::services::get_upload_store;
use crate::utils::read_upload_form;
use crate::utils::validate::validate_student_name;

/// 更新学生档案
///
/// 未出现的文本字段保持原值，出现但为空的简介/技能会被清空。
/// 新上传的头像或简历替换旧文件，旧文件在数据库更新成功后删除。
pub async fn handle_update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_student_by_id(id).await {
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

    let store = get_upload_store(request);
    let mut form = match read_upload_form(payload, &store, STUDENT_FILE_FIELDS).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };

    let name = if form.has_text("name") {
        let Some(name) = form.text("name") else {
            form.discard(&store);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Student name cannot be empty",
            )));
        };
        if let Err(msg) = validate_student_name(&name) {
            form.discard(&store);
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
        Some(name)
    } else {
        None
    };

    let optional_text = |field: &str| {
        form.has_text(field)
            .then(|| form.text(field).unwrap_or_default())
    };

    let update = UpdateStudentRequest {
        name,
        description: optional_text("description"),
        skills: optional_text("skills"),
        profile_picture: form
            .take_file("profile_picture")
            .map(|f| f.into_attached()),
        resume: form.take_file("resume").map(|f| f.into_attached()),
    };

    // 被替换的旧文件、本次新写入的文件
    let mut replaced = Vec::new();
    let mut added = Vec::new();
    if let Some(new) = &update.profile_picture {
        added.push(new.stored_name.clone());
        replaced.extend(existing.profile_picture.as_ref().map(|f| f.stored_name.clone()));
    }
    if let Some(new) = &update.resume {
        added.push(new.stored_name.clone());
        replaced.extend(existing.resume.as_ref().map(|f| f.stored_name.clone()));
    }

    match storage.update_student(id, update).await {
        Ok(Some(student)) => {
            for stored_name in &replaced {
                store.remove_quietly(stored_name);
            }
            tracing::info!("Student {} updated", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student },
                "Student updated successfully",
            )))
        }
        Ok(None) => {
            for stored_name in &added {
                store.remove_quietly(stored_name);
            }
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to update student {}: {}", id, e);
            for stored_name in &added {
                store.remove_quietly(stored_name);
            }
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::StudentUpdateFailed,
                    "Failed to update student",
                )),
            )
        }
    }
}
