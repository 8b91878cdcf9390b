pub mod create;
pub mod delete;
pub mod download;
pub mod get;
pub mod list;
pub mod overview;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::materials::requests::{MaterialListQuery, UpdateMaterialRequest};
use crate::storage::Storage;

pub struct MaterialService {
    storage: Option<Arc<dyn Storage>>,
}

impl MaterialService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 首页：按类别分组的全部资料
    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::handle_overview(self, request).await
    }

    pub async fn list_materials(
        &self,
        request: &HttpRequest,
        query: MaterialListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_materials(self, request, query).await
    }

    pub async fn get_material(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::handle_get_material(self, request, id).await
    }

    pub async fn download_material(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        download::handle_download_material(self, request, id).await
    }

    // 管理员上传资料（multipart）
    pub async fn create_material(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_material(self, request, payload).await
    }

    pub async fn update_material(
        &self,
        request: &HttpRequest,
        id: i64,
        update: UpdateMaterialRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_material(self, request, id, update).await
    }

    pub async fn delete_material(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_material(self, request, id).await
    }
}
