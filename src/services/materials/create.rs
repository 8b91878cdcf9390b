use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    materials::{
        entities::MaterialCategory, requests::CreateMaterialRequest, responses::MaterialResponse,
    },
};
use crate::services::get_upload_store;
use crate::utils::validate::validate_title;
use crate::utils::{UploadKind, read_upload_form};

pub async fn handle_create_material(
    service: &MaterialService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let store = get_upload_store(request);

    let mut form = match read_upload_form(payload, &store, &[("file", UploadKind::Material)]).await
    {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };

    let description = form.text("description");
    let (title, category, file) =
        match (form.text("title"), form.text("category"), form.take_file("file")) {
            (Some(title), Some(category), Some(file)) => (title, category, file),
            (_, _, file) => {
                if let Some(file) = file {
                    store.remove_quietly(&file.stored_name);
                }
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "Please fill in all required fields",
                )));
            }
        };

    if let Err(msg) = validate_title(&title) {
        store.remove_quietly(&file.stored_name);
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let category = match category.parse::<MaterialCategory>() {
        Ok(category) => category,
        Err(msg) => {
            store.remove_quietly(&file.stored_name);
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MaterialInvalidCategory, msg)));
        }
    };

    let storage = service.get_storage(request);
    let create = CreateMaterialRequest {
        title,
        category,
        description,
        stored_name: file.stored_name.clone(),
        original_name: file.original_name,
        file_size: file.size,
        content_type: file.content_type,
        uploaded_by: RequireJWT::extract_user_id(request),
    };

    match storage.create_material(create).await {
        Ok(material) => {
            tracing::info!(
                "Material {} uploaded as {} ({} bytes)",
                material.id,
                material.stored_name,
                material.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                MaterialResponse { material },
                "Material uploaded successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to create material: {}", e);
            store.remove_quietly(&file.stored_name);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::MaterialCreationFailed,
                    "Failed to save material",
                )),
            )
        }
    }
}
