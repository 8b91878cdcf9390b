//! 测试辅助：内存数据库、临时上传目录、multipart 请求体

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaCacheWrapper;
use crate::config::{AppConfig, UploadConfig};
use crate::models::AppStartTime;
use crate::models::users::{entities::User, entities::UserRole, requests::CreateUserRequest};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::upload_store::UploadStore;

/// 最小的合法 PDF 头
pub(crate) const PDF_BYTES: &[u8] =
    b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<< >>\nendobj\ntrailer\n<< >>\n%%EOF\n";

/// PNG 签名加 IHDR 块
pub(crate) const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];

pub(crate) async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory sqlite");
    Arc::new(storage)
}

/// 每次调用得到独立的空目录，单文件上限 64 KiB
pub(crate) fn temp_upload_store() -> UploadStore {
    let root = std::env::temp_dir().join(format!("ananas-uploads-{}", uuid::Uuid::new_v4()));
    let config = UploadConfig {
        max_size: 64 * 1024,
        ..AppConfig::get().upload.clone()
    };
    let store = UploadStore::with_root(root, &config);
    store.ensure_dir().expect("temp upload dir");
    store
}

pub(crate) async fn create_user(
    storage: &dyn Storage,
    username: &str,
    password: &str,
    role: UserRole,
) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            password: hash_password(password).expect("hash"),
            role,
        })
        .await
        .expect("create user")
}

/// 路由测试共享的应用状态
pub(crate) struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub uploads: UploadStore,
    pub started: AppStartTime,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            storage: memory_storage().await,
            cache: Arc::new(MokaCacheWrapper::with_settings(1_000, 300)),
            uploads: temp_upload_store(),
            started: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        }
    }

    pub async fn add_user(&self, username: &str, password: &str, role: UserRole) -> User {
        create_user(self.storage.as_ref(), username, password, role).await
    }

    /// 创建用户并签发 access token
    pub async fn token_for(&self, username: &str, role: UserRole) -> String {
        let user = self.add_user(username, "Secret123", role).await;
        JwtUtils::generate_access_token(user.id, &user.role.to_string()).expect("token")
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.uploads.root())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }
}

/// 按测试上下文构建完整的 API 应用
macro_rules! init_test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middlewares::security_headers())
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .app_data(actix_web::web::Data::new($ctx.uploads.clone()))
                .app_data(actix_web::web::Data::new($ctx.started.clone()))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler($crate::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler($crate::utils::query_error_handler),
                )
                .configure($crate::routes::configure_api_routes),
        )
        .await
    };
}
pub(crate) use init_test_app;

/// 手工拼装 multipart/form-data 请求体
pub(crate) struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("ananas-boundary-{}", uuid::Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// 返回 (Content-Type 头, 请求体)
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }

    /// 直接写入测试请求
    pub fn into_request(self, request: actix_web::test::TestRequest) -> actix_web::test::TestRequest {
        let (content_type, body) = self.finish();
        request
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
    }
}
