use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::get_upload_store;

pub async fn handle_delete_material(
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

    // 文件已不存在时仍删除记录
    let store = get_upload_store(request);
    match store.remove(&material.stored_name) {
        Ok(true) => {}
        Ok(false) => tracing::warn!(
            "File {} of material {} was already missing",
            material.stored_name,
            id
        ),
        Err(e) => {
            tracing::error!("Failed to delete file of material {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileDeleteFailed,
                    "Failed to delete material file",
                )),
            );
        }
    }

    match storage.delete_material(id).await {
        Ok(_) => {
            tracing::info!("Material {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Material deleted successfully")))
        }
        Err(e) => {
            tracing::error!("Failed to delete material {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::MaterialDeleteFailed,
                    "Failed to delete material",
                )),
            )
        }
    }
}
