use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{
    ApiResponse, ErrorCode,
    materials::{requests::UpdateMaterialRequest, responses::MaterialResponse},
};
use crate::utils::validate::validate_title;

pub async fn handle_update_material(
    service: &MaterialService,
    request: &HttpRequest,
    id: i64,
    mut update: UpdateMaterialRequest,
) -> ActixResult<HttpResponse> {
    if update.title.is_none() && update.category.is_none() && update.description.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "No fields to update",
        )));
    }

    if let Some(title) = update.title.take() {
        let title = title.trim().to_string();
        if let Err(msg) = validate_title(&title) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
        update.title = Some(title);
    }

    let storage = service.get_storage(request);

    match storage.update_material(id, update).await {
        Ok(Some(material)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MaterialResponse { material },
            "Material updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MaterialNotFound,
            "Material not found",
        ))),
        Err(e) => {
            tracing::error!("Failed to update material {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::MaterialUpdateFailed,
                    "Failed to update material",
                )),
            )
        }
    }
}
