pub mod create;
pub mod delete;
pub mod download;
pub mod get;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::{entities::StudentFileKind, requests::StudentListQuery};
use crate::storage::Storage;
use crate::utils::UploadKind;

/// 学生档案表单中的文件字段
pub(crate) const STUDENT_FILE_FIELDS: &[(&str, UploadKind)] = &[
    ("profile_picture", UploadKind::Image),
    ("resume", UploadKind::Document),
];

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_students(self, request, query).await
    }

    pub async fn get_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::handle_get_student(self, request, id).await
    }

    // 下载头像或简历
    pub async fn download_file(
        &self,
        request: &HttpRequest,
        id: i64,
        kind: StudentFileKind,
    ) -> ActixResult<HttpResponse> {
        download::handle_download_student_file(self, request, id, kind).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_student(self, request, payload).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_student(self, request, id, payload).await
    }

    pub async fn delete_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::handle_delete_student(self, request, id).await
    }
}
