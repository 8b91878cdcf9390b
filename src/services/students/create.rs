use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{STUDENT_FILE_FIELDS, StudentService};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
};
use crate::services::get_upload_store;
use crate::utils::read_upload_form;
use crate::utils::validate::validate_student_name;

pub async fn handle_create_student(
    service: &StudentService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let store = get_upload_store(request);

    let mut form = match read_upload_form(payload, &store, STUDENT_FILE_FIELDS).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };

    let Some(name) = form.text("name") else {
        form.discard(&store);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Please provide at least the student name",
        )));
    };

    if let Err(msg) = validate_student_name(&name) {
        form.discard(&store);
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let create = CreateStudentRequest {
        name,
        description: form.text("description"),
        skills: form.text("skills"),
        profile_picture: form
            .take_file("profile_picture")
            .map(|f| f.into_attached()),
        resume: form.take_file("resume").map(|f| f.into_attached()),
    };
    let new_files: Vec<String> = [&create.profile_picture, &create.resume]
        .into_iter()
        .flatten()
        .map(|f| f.stored_name.clone())
        .collect();

    let storage = service.get_storage(request);
    match storage.create_student(create).await {
        Ok(student) => {
            tracing::info!("Student {} ({}) created", student.id, student.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Student created successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to create student: {}", e);
            for stored_name in &new_files {
                store.remove_quietly(stored_name);
            }
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::StudentCreationFailed,
                    "Failed to create student",
                )),
            )
        }
    }
}
