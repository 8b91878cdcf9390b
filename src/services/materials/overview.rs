use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{
    ApiResponse, ErrorCode,
    materials::{entities::MaterialCategory, responses::MaterialOverviewResponse},
};

pub async fn handle_overview(
    service: &MaterialService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (notes, exercises, exams) = match futures_util::try_join!(
        storage.list_materials_by_category(MaterialCategory::Notes),
        storage.list_materials_by_category(MaterialCategory::Exercise),
        storage.list_materials_by_category(MaterialCategory::Exam),
    ) {
        Ok(groups) => groups,
        Err(e) => {
            tracing::error!("Failed to load material overview: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to load materials",
                )),
            );
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MaterialOverviewResponse {
            notes,
            exercises,
            exams,
        },
        "Materials retrieved successfully",
    )))
}
