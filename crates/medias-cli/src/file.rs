use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reservation metadata for a local file, plus its bytes.
#[derive(Debug, Clone)]
pub struct PreparedFile {
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    pub contents: Vec<u8>,
}

/// Base64 (standard alphabet) of the SHA-256 digest.
pub fn checksum_base64(data: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(data))
}

/// MIME type guessed from the file extension, `application/octet-stream` when unknown.
pub fn detect_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read `path` and compute everything a reservation needs. `mime_type` overrides detection.
pub async fn prepare_file(path: &Path, mime_type: Option<&str>) -> Result<PreparedFile> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .with_context(|| format!("Invalid file path: {}", path.display()))?;

    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mime_type = match mime_type {
        Some(m) if !m.trim().is_empty() => m.trim().to_string(),
        _ => detect_mime_type(path),
    };

    tracing::debug!(
        filename = %filename,
        size = contents.len(),
        mime_type = %mime_type,
        "Prepared file"
    );

    Ok(PreparedFile {
        filename,
        mime_type,
        size: contents.len() as i64,
        sha256: checksum_base64(&contents),
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn checksum_is_base64_sha256() {
        assert_eq!(
            checksum_base64(b""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
        assert_eq!(
            checksum_base64(b"abc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(detect_mime_type(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(detect_mime_type(Path::new("photo.PNG")), "image/png");
        assert_eq!(
            detect_mime_type(Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn prepare_file_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"abc")
            .unwrap();

        let prepared = prepare_file(&path, None).await.unwrap();
        assert_eq!(prepared.filename, "photo.png");
        assert_eq!(prepared.mime_type, "image/png");
        assert_eq!(prepared.size, 3);
        assert_eq!(prepared.sha256, checksum_base64(b"abc"));

        let overridden = prepare_file(&path, Some("image/webp")).await.unwrap();
        assert_eq!(overridden.mime_type, "image/webp");
    }

    #[tokio::test]
    async fn prepare_missing_file_fails() {
        let err = prepare_file(Path::new("/nonexistent/clip.mp4"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
