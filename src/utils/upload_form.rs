//! multipart 表单读取
//!
//! 文本字段收集到内存，文件字段边读边写入上传目录。
//! 写入前校验扩展名白名单，写入过程中校验魔术字节和大小上限；
//! 任一字段被拒绝时，本次请求已写入的文件全部删除。

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use futures_util::{StreamExt, TryStreamExt};
use tracing::{debug, error};

use super::file_magic::{MAGIC_PROBE_LEN, validate_magic_bytes};
use super::filename::{extension_of, secure_filename_or};
use super::upload_store::{UploadKind, UploadStore};
use crate::errors::AnanasError;
use crate::models::students::entities::AttachedFile;
use crate::models::{ApiResponse, ErrorCode};

/// 单个文本字段的最大字节数
const MAX_TEXT_FIELD_LEN: usize = 64 * 1024;

/// 已写入上传目录的文件
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub stored_name: String,
    pub original_name: String,
    pub size: i64,
    pub content_type: String,
}

impl SavedFile {
    pub fn into_attached(self) -> AttachedFile {
        AttachedFile {
            stored_name: self.stored_name,
            file_name: self.original_name,
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    texts: HashMap<String, String>,
    files: HashMap<String, SavedFile>,
}

impl UploadForm {
    /// 去除首尾空白后的文本字段，空串视为缺失
    pub fn text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// 字段是否出现过（可能为空串）
    pub fn has_text(&self, name: &str) -> bool {
        self.texts.contains_key(name)
    }

    pub fn file(&self, name: &str) -> Option<&SavedFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<SavedFile> {
        self.files.remove(name)
    }

    /// 删除本表单已写入的所有文件
    pub fn discard(self, store: &UploadStore) {
        for file in self.files.into_values() {
            store.remove_quietly(&file.stored_name);
        }
    }
}

#[derive(Debug)]
pub enum UploadError {
    /// multipart 格式错误或文本字段过长
    Malformed(String),
    /// 同一文件字段出现多次
    DuplicateFile(String),
    /// 扩展名不在白名单内
    TypeNotAllowed(String),
    /// 内容与扩展名不符
    ContentMismatch(String),
    TooLarge(String),
    Io(AnanasError),
}

impl UploadError {
    pub fn error_response(&self) -> HttpResponse {
        match self {
            UploadError::Malformed(msg) => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::BadRequest, format!("Malformed upload: {msg}")),
            ),
            UploadError::DuplicateFile(field) => {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::MultifileUploadNotAllowed,
                    format!("Only one file can be uploaded for field '{field}'"),
                ))
            }
            UploadError::TypeNotAllowed(name) => {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    format!("File type not allowed: {name}"),
                ))
            }
            UploadError::ContentMismatch(name) => {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    format!("File content does not match its extension: {name}"),
                ))
            }
            UploadError::TooLarge(name) => {
                HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    format!("File size exceeds the limit: {name}"),
                ))
            }
            UploadError::Io(e) => {
                error!("{}", e);
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "Failed to save uploaded file",
                ))
            }
        }
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Malformed(msg) => write!(f, "malformed upload: {msg}"),
            UploadError::DuplicateFile(field) => write!(f, "duplicate file field: {field}"),
            UploadError::TypeNotAllowed(name) => write!(f, "file type not allowed: {name}"),
            UploadError::ContentMismatch(name) => write!(f, "content mismatch: {name}"),
            UploadError::TooLarge(name) => write!(f, "file too large: {name}"),
            UploadError::Io(e) => write!(f, "{e}"),
        }
    }
}

/// 读取整个 multipart 表单
///
/// `file_fields` 列出接受文件的字段及其用途；其余带文件名的字段被丢弃。
/// 文件名为空的文件字段（浏览器未选择文件）视为缺失。
pub async fn read_upload_form(
    mut payload: Multipart,
    store: &UploadStore,
    file_fields: &[(&str, UploadKind)],
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();
    match read_fields(&mut payload, store, file_fields, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            debug!("Upload rejected: {}", e);
            form.discard(store);
            Err(e)
        }
    }
}

async fn read_fields(
    payload: &mut Multipart,
    store: &UploadStore,
    file_fields: &[(&str, UploadKind)],
    form: &mut UploadForm,
) -> Result<(), UploadError> {
    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        match filename {
            None => {
                let text = read_text(field).await?;
                form.texts.insert(name, text);
            }
            Some(filename) => {
                let kind = file_fields
                    .iter()
                    .find(|(field_name, _)| *field_name == name)
                    .map(|(_, kind)| *kind);
                let Some(kind) = kind.filter(|_| !filename.trim().is_empty()) else {
                    drain(field).await?;
                    continue;
                };
                if form.files.contains_key(&name) {
                    drain(field).await?;
                    return Err(UploadError::DuplicateFile(name));
                }
                let saved = save_file(field, &filename, kind, store).await?;
                form.files.insert(name, saved);
            }
        }
    }
    Ok(())
}

async fn read_text(mut field: Field) -> Result<String, UploadError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
        if buf.len() + data.len() > MAX_TEXT_FIELD_LEN {
            return Err(UploadError::Malformed("text field too long".into()));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| UploadError::Malformed("text field is not UTF-8".into()))
}

async fn drain(mut field: Field) -> Result<(), UploadError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
    }
    Ok(())
}

async fn save_file(
    mut field: Field,
    filename: &str,
    kind: UploadKind,
    store: &UploadStore,
) -> Result<SavedFile, UploadError> {
    let original_name = secure_filename_or(filename, "file");
    let extension = extension_of(&original_name);
    if !store.allows(kind, &extension) {
        drain(field).await?;
        return Err(UploadError::TypeNotAllowed(original_name));
    }

    // MIME 类型只做记录，不参与校验
    let content_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let stored_name = UploadStore::new_stored_name();
    let mut file = store.create(&stored_name).map_err(UploadError::Io)?;

    let written = write_field(
        &mut field,
        &mut file,
        &original_name,
        &extension,
        store.max_size(),
    )
    .await;
    drop(file);

    match written {
        Ok(size) => Ok(SavedFile {
            stored_name,
            original_name,
            size: size as i64,
            content_type,
        }),
        Err(e) => {
            store.remove_quietly(&stored_name);
            Err(e)
        }
    }
}

/// 写入文件并返回总字节数
///
/// 凑够 [`MAGIC_PROBE_LEN`] 字节后立即校验魔术字节；文件更短时在结尾校验。
async fn write_field(
    field: &mut Field,
    file: &mut File,
    original_name: &str,
    extension: &str,
    max_size: usize,
) -> Result<usize, UploadError> {
    let mut total: usize = 0;
    let mut probe: Vec<u8> = Vec::with_capacity(MAGIC_PROBE_LEN);
    let mut verified = false;

    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;

        total += data.len();
        if total > max_size {
            return Err(UploadError::TooLarge(original_name.to_string()));
        }

        if !verified {
            let need = MAGIC_PROBE_LEN - probe.len();
            probe.extend_from_slice(&data[..data.len().min(need)]);
            if probe.len() >= MAGIC_PROBE_LEN {
                if !validate_magic_bytes(&probe, extension) {
                    return Err(UploadError::ContentMismatch(original_name.to_string()));
                }
                verified = true;
            }
        }

        file.write_all(&data)
            .map_err(|e| UploadError::Io(AnanasError::file_operation(e.to_string())))?;
    }

    // 空文件 validate_magic_bytes 返回 false
    if !verified && !validate_magic_bytes(&probe, extension) {
        return Err(UploadError::ContentMismatch(original_name.to_string()));
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{MultipartBody, PDF_BYTES, PNG_BYTES, temp_upload_store};
    use actix_web::{FromRequest, test::TestRequest};

    async fn read(
        body: MultipartBody,
        store: &UploadStore,
        fields: &[(&str, UploadKind)],
    ) -> Result<UploadForm, UploadError> {
        let (content_type, bytes) = body.finish();
        let (req, mut pl) = TestRequest::default()
            .insert_header(("content-type", content_type))
            .set_payload(bytes)
            .to_http_parts();
        let multipart = Multipart::from_request(&req, &mut pl).await.unwrap();
        read_upload_form(multipart, store, fields).await
    }

    fn file_count(store: &UploadStore) -> usize {
        std::fs::read_dir(store.root()).unwrap().count()
    }

    #[actix_web::test]
    async fn test_text_and_file_fields() {
        let store = temp_upload_store();
        let body = MultipartBody::new()
            .text("title", "  Week 1  ")
            .text("description", "")
            .file("file", "week 1.pdf", "application/pdf", PDF_BYTES);

        let mut form = read(body, &store, &[("file", UploadKind::Material)])
            .await
            .unwrap();

        assert_eq!(form.text("title").as_deref(), Some("Week 1"));
        assert_eq!(form.text("description"), None);
        assert!(form.has_text("description"));

        let saved = form.take_file("file").unwrap();
        assert_eq!(saved.original_name, "week_1.pdf");
        assert_eq!(saved.size, PDF_BYTES.len() as i64);
        assert_eq!(saved.content_type, "application/pdf");
        assert_eq!(
            store.read(&saved.stored_name).unwrap().as_deref(),
            Some(PDF_BYTES)
        );
    }

    #[actix_web::test]
    async fn test_empty_filename_is_absent() {
        let store = temp_upload_store();
        let body = MultipartBody::new()
            .text("name", "Ada")
            .file("resume", "", "application/octet-stream", b"");

        let form = read(body, &store, &[("resume", UploadKind::Document)])
            .await
            .unwrap();
        assert!(form.file("resume").is_none());
        assert_eq!(file_count(&store), 0);
    }

    #[actix_web::test]
    async fn test_extension_rejected() {
        let store = temp_upload_store();
        let body = MultipartBody::new().file("file", "run.exe", "application/x-msdownload", b"MZ");

        let err = read(body, &store, &[("file", UploadKind::Material)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TypeNotAllowed(_)));
        assert_eq!(file_count(&store), 0);
    }

    #[actix_web::test]
    async fn test_magic_mismatch_cleans_up_earlier_files() {
        let store = temp_upload_store();
        let body = MultipartBody::new()
            .file("profile_picture", "me.png", "image/png", PNG_BYTES)
            .file("resume", "cv.pdf", "application/pdf", b"definitely not a pdf file");

        let err = read(
            body,
            &store,
            &[
                ("profile_picture", UploadKind::Image),
                ("resume", UploadKind::Document),
            ],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UploadError::ContentMismatch(_)));
        assert_eq!(file_count(&store), 0);
    }

    #[actix_web::test]
    async fn test_empty_file_rejected() {
        let store = temp_upload_store();
        let body = MultipartBody::new().file("file", "empty.pdf", "application/pdf", b"");

        let err = read(body, &store, &[("file", UploadKind::Material)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::ContentMismatch(_)));
        assert_eq!(file_count(&store), 0);
    }

    #[actix_web::test]
    async fn test_duplicate_file_field() {
        let store = temp_upload_store();
        let body = MultipartBody::new()
            .file("file", "a.pdf", "application/pdf", PDF_BYTES)
            .file("file", "b.pdf", "application/pdf", PDF_BYTES);

        let err = read(body, &store, &[("file", UploadKind::Material)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::DuplicateFile(_)));
        assert_eq!(file_count(&store), 0);
    }

    #[actix_web::test]
    async fn test_size_limit() {
        let store = temp_upload_store();
        let mut big = PDF_BYTES.to_vec();
        big.resize(store.max_size() + 1, b'x');
        let body = MultipartBody::new().file("file", "big.pdf", "application/pdf", &big);

        let err = read(body, &store, &[("file", UploadKind::Material)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge(_)));
        assert_eq!(file_count(&store), 0);
    }
}
