/// 判断文件类型所需读取的最少字节数
pub const MAGIC_PROBE_LEN: usize = 16;

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节（至多 [`MAGIC_PROBE_LEN`] 字节即可）
/// * `extension` - 文件扩展名（包含点号，如 ".png"）
///
/// # Returns
/// * `true` - 魔术字节匹配
/// * `false` - 魔术字节不匹配，或扩展名未知
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // 图片格式
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",

        // 文档格式
        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => {
            // MS Office 旧格式 (OLE Compound Document)
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        }
        ".docx" | ".xlsx" | ".pptx" | ".zip" => {
            // ZIP 容器（OOXML 亦是 ZIP）
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
        }

        // 纯文本：开头不应出现 NUL
        ".txt" | ".md" => !data.contains(&0),

        // 未知格式 - 默认拒绝
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.7\n";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(!validate_magic_bytes(pdf_header, ".docx"));
    }

    #[test]
    fn test_office_documents() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip, ".docx"));
        assert!(validate_magic_bytes(&zip, ".pptx"));
        assert!(validate_magic_bytes(&zip, ".zip"));
        assert!(!validate_magic_bytes(&zip, ".doc"));
    }

    #[test]
    fn test_webp_needs_full_header() {
        assert!(validate_magic_bytes(b"RIFF\x24\x00\x00\x00WEBPVP8 ", ".webp"));
        assert!(!validate_magic_bytes(b"RIFF\x24\x00", ".webp"));
    }

    #[test]
    fn test_text_files() {
        assert!(validate_magic_bytes(b"# Lecture 3\n", ".md"));
        assert!(validate_magic_bytes(b"Hello, World!", ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00\x03\x00", ".txt"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(&[], ".txt"));
    }

    #[test]
    fn test_unknown_extension() {
        let data = [0x4D, 0x5A, 0x90, 0x00];
        assert!(!validate_magic_bytes(&data, ".exe"));
        assert!(!validate_magic_bytes(&data, ""));
    }
}
