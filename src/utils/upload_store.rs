//! 上传目录
//!
//! 所有上传文件平铺存放在同一个目录下，文件名由服务端生成，
//! 客户端提供的文件名只保存在数据库里用于下载时的 `Content-Disposition`。

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::{AnanasError, Result};

/// 上传文件的用途，决定扩展名白名单
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// 课程资料
    Material,
    /// 学生头像
    Image,
    /// 学生简历
    Document,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_size: usize,
    material_types: Vec<String>,
    image_types: Vec<String>,
    document_types: Vec<String>,
}

impl UploadStore {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self::with_root(&config.dir, config)
    }

    /// 使用指定目录，其余限制取自配置
    pub fn with_root(root: impl Into<PathBuf>, config: &UploadConfig) -> Self {
        let lower = |types: &[String]| types.iter().map(|t| t.to_lowercase()).collect();
        Self {
            root: root.into(),
            max_size: config.max_size,
            material_types: lower(&config.material_types),
            image_types: lower(&config.image_types),
            document_types: lower(&config.document_types),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn allowed_types(&self, kind: UploadKind) -> &[String] {
        match kind {
            UploadKind::Material => &self.material_types,
            UploadKind::Image => &self.image_types,
            UploadKind::Document => &self.document_types,
        }
    }

    /// `extension` 需带点号且为小写
    pub fn allows(&self, kind: UploadKind, extension: &str) -> bool {
        !extension.is_empty() && self.allowed_types(kind).iter().any(|t| t == extension)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            AnanasError::file_operation(format!(
                "Failed to create upload directory {}: {e}",
                self.root.display()
            ))
        })
    }

    /// 生成新的存储文件名：`{时间戳}-{uuid}.bin`
    pub fn new_stored_name() -> String {
        format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4())
    }

    /// 存储文件名只能是单层文件名
    pub fn path_of(&self, stored_name: &str) -> Result<PathBuf> {
        let plain = !stored_name.is_empty()
            && stored_name != "."
            && stored_name != ".."
            && !stored_name.contains(['/', '\\', '\0']);
        if !plain {
            return Err(AnanasError::validation(format!(
                "Invalid stored file name: {stored_name:?}"
            )));
        }
        Ok(self.root.join(stored_name))
    }

    pub fn create(&self, stored_name: &str) -> Result<File> {
        let path = self.path_of(stored_name)?;
        Ok(File::create(path)?)
    }

    /// 读取文件内容，文件不存在时返回 `None`
    pub fn read(&self, stored_name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_of(stored_name)?;
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 删除文件，返回文件此前是否存在
    pub fn remove(&self, stored_name: &str) -> Result<bool> {
        let path = self.path_of(stored_name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// 尽力删除，失败只记录日志
    pub fn remove_quietly(&self, stored_name: &str) {
        if let Err(e) = self.remove(stored_name) {
            tracing::warn!("Failed to remove uploaded file {}: {}", stored_name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::temp_upload_store;
    use std::io::Write;

    #[test]
    fn test_stored_name_shape() {
        let a = UploadStore::new_stored_name();
        let b = UploadStore::new_stored_name();
        assert_ne!(a, b);
        assert!(a.ends_with(".bin"));
        assert!(a.split_once('-').unwrap().0.parse::<i64>().is_ok());
    }

    #[test]
    fn test_path_of_rejects_traversal() {
        let store = temp_upload_store();
        assert!(store.path_of("../secret").is_err());
        assert!(store.path_of("a/b.bin").is_err());
        assert!(store.path_of("a\\b.bin").is_err());
        assert!(store.path_of("..").is_err());
        assert!(store.path_of("").is_err());
        assert_eq!(
            store.path_of("1-x.bin").unwrap(),
            store.root().join("1-x.bin")
        );
    }

    #[test]
    fn test_create_read_remove() {
        let store = temp_upload_store();
        let name = UploadStore::new_stored_name();

        let mut file = store.create(&name).unwrap();
        file.write_all(b"hello").unwrap();
        drop(file);

        assert_eq!(store.read(&name).unwrap().as_deref(), Some(&b"hello"[..]));
        assert!(store.remove(&name).unwrap());
        assert!(!store.remove(&name).unwrap());
        assert_eq!(store.read(&name).unwrap(), None);
    }

    #[test]
    fn test_allowed_types() {
        let store = temp_upload_store();
        assert!(store.allows(UploadKind::Material, ".pdf"));
        assert!(store.allows(UploadKind::Image, ".png"));
        assert!(!store.allows(UploadKind::Image, ".pdf"));
        assert!(store.allows(UploadKind::Document, ".pdf"));
        assert!(!store.allows(UploadKind::Document, ".exe"));
        assert!(!store.allows(UploadKind::Material, ""));
    }
}
