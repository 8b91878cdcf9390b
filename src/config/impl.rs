use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 部署模板中的占位密钥，视同未设置
const PLACEHOLDER_SECRETS: &[&str] = &["generate-a-secure-key-here", "your-secret-key-here"];

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // ANANAS_UPLOAD__MAX_SIZE -> upload.max_size
            .add_source(
                Environment::with_prefix("ANANAS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // 常用环境变量覆盖；SECRET_KEY 优先于 JWT_SECRET
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("jwt.secret", std::env::var("SECRET_KEY").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        if Self::is_weak_secret(&app_config.jwt.secret) {
            app_config.jwt.secret = generate_secret(64);
            app_config.jwt.secret_generated = true;
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    fn is_weak_secret(secret: &str) -> bool {
        let secret = secret.trim();
        secret.is_empty() || PLACEHOLDER_SECRETS.contains(&secret)
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

fn generate_secret(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_secrets_are_weak() {
        assert!(AppConfig::is_weak_secret(""));
        assert!(AppConfig::is_weak_secret("   "));
        assert!(AppConfig::is_weak_secret("generate-a-secure-key-here"));
        assert!(!AppConfig::is_weak_secret("a-real-deployment-secret"));
    }

    #[test]
    fn test_generated_secret() {
        let secret = generate_secret(64);
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_secret(64));
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let partial: AppConfig = Config::builder()
            .set_override("server.port", 9000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(partial.server.port, 9000);
        assert_eq!(partial.server.host, "127.0.0.1");
        assert_eq!(partial.database.url, "education.db");
        assert!(partial.upload.image_types.contains(&".png".to_string()));
    }

    #[test]
    fn test_default_config_file_loads() {
        let config = AppConfig::get();
        assert!(!config.jwt.secret.is_empty());
        assert!(config.server.workers >= 1);
        assert_eq!(config.upload.max_size, 16 * 1024 * 1024);
    }
}
