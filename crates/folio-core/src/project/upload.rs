//! User-selected image files
//!
//! Uploads are passed through to the backend as-is; nothing here decodes or
//! resizes image data.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// An image file pending upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Wrap in-memory bytes, sniffing the MIME type
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = detect_image_mime_type(&bytes).to_string();
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", path.display())))?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let upload = Self::from_bytes(file_name, bytes);
        debug!(
            file = %upload.file_name,
            mime = %upload.mime_type,
            bytes = upload.bytes.len(),
            "Loaded image for upload"
        );
        Ok(upload)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Detect MIME type from magic bytes
pub fn detect_image_mime_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(&b"WEBP"[..]) {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}
