use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{file_download_response, get_upload_store};

pub async fn handle_download_material(
    service: &MaterialService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let material = match storage.get_material_by_id(id).await {
        Ok(Some(material)) => material,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MaterialNotFound,
                "Material not found",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to get material {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to get material",
                )),
            );
        }
    };

    let store = get_upload_store(request);
    Ok(file_download_response(
        &store,
        &material.stored_name,
        &material.file_name,
    ))
}
