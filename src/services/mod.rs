pub mod auth;
pub mod materials;
pub mod students;
pub mod system;

pub use auth::AuthService;
pub use materials::MaterialService;
pub use students::StudentService;
pub use system::SystemService;

use actix_web::{
    HttpRequest, HttpResponse,
    http::header::{self, ContentDisposition},
};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::UploadStore;
use crate::utils::filename::content_type_for;

pub(crate) fn get_upload_store(request: &HttpRequest) -> UploadStore {
    request
        .app_data::<actix_web::web::Data<UploadStore>>()
        .expect("Upload store not found in app data")
        .get_ref()
        .clone()
}

/// 以附件形式返回上传目录中的文件，文件缺失时返回 404
pub(crate) fn file_download_response(
    store: &UploadStore,
    stored_name: &str,
    file_name: &str,
) -> HttpResponse {
    match store.read(stored_name) {
        Ok(Some(bytes)) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(file_name)))
            .insert_header(ContentDisposition::attachment(file_name))
            .body(bytes),
        Ok(None) => {
            tracing::warn!("Stored file {} is missing from the upload directory", stored_name);
            HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            ))
        }
        Err(e) => {
            tracing::error!("Failed to read stored file {}: {}", stored_name, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            ))
        }
    }
}
