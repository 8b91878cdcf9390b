use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime, system::responses::HealthResponse};

pub async fn handle_health(
    _service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| (chrono::Utc::now() - start.start_datetime).num_seconds().max(0))
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
        },
        "Service is healthy",
    )))
}
