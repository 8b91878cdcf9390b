use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{ApiResponse, ErrorCode, materials::requests::MaterialListQuery};

pub async fn handle_list_materials(
    service: &MaterialService,
    request: &HttpRequest,
    query: MaterialListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_materials_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Materials retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to list materials: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to list materials",
                )),
            )
        }
    }
}
