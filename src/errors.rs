//! 库内部错误
//!
//! 存储、缓存、上传目录等基础设施返回 [`AnanasError`]；HTTP 层再把它映射为
//! `ApiResponse` 与对应的 `ErrorCode`，错误详情只写日志不回传客户端。

use std::fmt;

/// 声明错误枚举
///
/// 每个变体带一个错误代码和类型名称，并生成同名的 snake_case 构造函数，
/// 例如 `FileOperation` 对应 `AnanasError::file_operation(msg)`。
macro_rules! define_ananas_errors {
    ($(
        $(#[$meta:meta])*
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AnanasError {
            $($(#[$meta])* $variant(String),)*
        }

        impl AnanasError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(AnanasError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AnanasError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(AnanasError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl AnanasError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AnanasError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_ananas_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    /// 上传目录读写
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    Serialization("E008", "Serialization Error"),
    /// Argon2 参数或哈希失败
    PasswordHash("E009", "Password Hash Error"),
}

impl fmt::Display for AnanasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl std::error::Error for AnanasError {}

impl From<sea_orm::DbErr> for AnanasError {
    fn from(err: sea_orm::DbErr) -> Self {
        AnanasError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AnanasError {
    fn from(err: std::io::Error) -> Self {
        AnanasError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AnanasError {
    fn from(err: serde_json::Error) -> Self {
        AnanasError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnanasError>;
