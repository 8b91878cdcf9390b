//! 上传文件名清洗
//!
//! 客户端提供的文件名只用于下载时的 `Content-Disposition`，落盘名由服务端生成。

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("Invalid filename regex"));

/// 清洗后文件名的最大长度
const MAX_FILENAME_LEN: usize = 200;

/// 将任意文件名转换为安全的 ASCII 文件名
///
/// 路径分隔符视为空白，空白折叠为 `_`，其余非 `[A-Za-z0-9_.-]` 字符删除，
/// 去掉首尾的 `.` 与 `_`。结果可能为空串。
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS_RE.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() <= MAX_FILENAME_LEN {
        return trimmed.to_string();
    }

    // 过长时保留扩展名
    let ext = extension_of(trimmed);
    let keep = MAX_FILENAME_LEN.saturating_sub(ext.len());
    format!("{}{}", &trimmed[..keep], ext)
}

/// 小写扩展名（含点号），无扩展名时返回空串
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 按扩展名推断下载时的 Content-Type
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_str() {
        ".pdf" => "application/pdf",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".txt" | ".md" => "text/plain; charset=utf-8",
        ".zip" => "application/zip",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}

/// 主文件名清洗后为空时（如全中文文件名），用 `fallback` 加原扩展名代替
pub fn secure_filename_or(filename: &str, fallback: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if !secure_filename(stem).is_empty() {
        return secure_filename(filename);
    }

    let ext = secure_filename(extension_of(filename).trim_start_matches('.'));
    if ext.is_empty() {
        fallback.to_string()
    } else {
        format!("{fallback}.{ext}")
    }
}
