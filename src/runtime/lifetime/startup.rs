use crate::cache::{ObjectCache, get_object_cache_plugin, register_builtin_plugins};
use crate::config::AppConfig;
use crate::errors::{AnanasError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::UploadStore;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 内置管理员账号
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub uploads: UploadStore,
}

async fn try_cache_backend(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        AnanasError::cache_plugin_not_found(format!("Cache backend '{name}' not registered"))
    })?;
    Ok(Arc::from(constructor().await?))
}

/// 按配置创建缓存，失败时回退到进程内 moka
async fn create_cache(config: &AppConfig) -> Result<Arc<dyn ObjectCache>> {
    let cache_type = config.cache.cache_type.as_str();

    match try_cache_backend(cache_type).await {
        Ok(cache) => {
            info!("Using {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != "moka" => {
            warn!("Failed to create {} cache: {}, falling back to moka", cache_type, e);
            try_cache_backend("moka").await
        }
        Err(e) => Err(e),
    }
}

/// 确保内置管理员存在，返回是否新建
///
/// 只按用户名判断，已存在的账号（包括改过密码的）不会被覆盖。
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<bool> {
    if storage
        .get_user_by_username(DEFAULT_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        debug!("Admin account already exists, skipping seed");
        return Ok(false);
    }

    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| {
            warn!("==========================================================");
            warn!("  ADMIN_PASSWORD not set, using the default admin password");
            warn!("  Log in as '{}' and change it immediately", DEFAULT_ADMIN_USERNAME);
            warn!("==========================================================");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

    let password_hash = hash_password(&password)?;

    let user = storage
        .create_user(CreateUserRequest {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: password_hash,
            role: UserRole::Admin,
        })
        .await?;

    info!(
        "Default admin account created (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(true)
}

/// 准备服务器启动的上下文：存储、缓存、上传目录
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    if config.jwt.secret_generated {
        warn!("SECRET_KEY not set, using a random signing key; sessions will not survive a restart");
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await?;

    let cache = create_cache(config).await?;

    let uploads = UploadStore::from_config(&config.upload);
    uploads.ensure_dir()?;
    info!("Upload directory: {}", uploads.root().display());

    Ok(StartupContext {
        storage,
        cache,
        uploads,
    })
}
