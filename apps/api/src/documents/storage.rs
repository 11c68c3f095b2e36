//! Upload validation and on-disk file storage.

use std::path::Path;

use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// A file written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated name: `{uuid}.{ext}`.
    pub filename: String,
    pub path: String,
    pub size: usize,
}

/// Checks extension and size constraints. Returns the lowercased extension.
pub fn validate_upload(filename: &str, size: usize) -> Result<String, AppError> {
    if size > MAX_FILE_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "File size too large. Maximum size is {}MB",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::Validation(format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    Ok(ext)
}

/// MIME type derived from the (already validated) extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Writes the upload under `upload_dir` with a generated unique name.
pub async fn save_file(
    upload_dir: &str,
    ext: &str,
    data: Vec<u8>,
) -> Result<StoredFile, AppError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create upload dir: {e}")))?;

    let size = data.len();
    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let path = Path::new(upload_dir)
        .join(&filename)
        .to_string_lossy()
        .into_owned();

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write {path}: {e}")))?;

    Ok(StoredFile {
        filename,
        path,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_known_extensions() {
        for name in ["cv.pdf", "cv.DOCX", "jd.txt", "old.doc"] {
            assert!(validate_upload(name, 1024).is_ok(), "{name} should pass");
        }
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let err = validate_upload("malware.exe", 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_missing_extension() {
        assert!(validate_upload("resume", 1024).is_err());
    }

    #[test]
    fn test_validate_rejects_oversize() {
        let err = validate_upload("cv.pdf", MAX_FILE_SIZE + 1).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_validate_lowercases_extension() {
        assert_eq!(validate_upload("CV.PDF", 10).unwrap(), "pdf");
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_for_extension("txt"), "text/plain");
        assert_eq!(
            mime_for_extension("docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[tokio::test]
    async fn test_save_file_writes_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let a = save_file(dir_str, "txt", b"hello".to_vec()).await.unwrap();
        let b = save_file(dir_str, "txt", b"world".to_vec()).await.unwrap();

        assert_ne!(a.filename, b.filename);
        assert_eq!(a.size, 5);
        assert_eq!(tokio::fs::read_to_string(&a.path).await.unwrap(), "hello");
    }
}
