use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{ApiResponse, ErrorCode, materials::responses::MaterialResponse};

pub async fn handle_get_material(
    service: &MaterialService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_material_by_id(id).await {
        Ok(Some(material)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MaterialResponse { material },
            "Material retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MaterialNotFound,
            "Material not found",
        ))),
        Err(e) => {
            tracing::error!("Failed to get material {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to get material",
                )),
            )
        }
    }
}
