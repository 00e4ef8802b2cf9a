//! Image intake for product forms.
//!
//! An uploaded file is written under the upload directory as
//! `<unix millis><original extension>`, then read back in full and handed to
//! the product record. The on-disk copy is left in place.

use crate::entities::product::IMAGE_CONTENT_TYPE;
use crate::errors::ServiceError;
use bytes::Bytes;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Image bytes ready to be stored on a product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A file part taken from a multipart form.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Browsers send an empty, nameless file part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Clone, Debug)]
pub struct ImageIntake {
    upload_dir: PathBuf,
}

impl ImageIntake {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Persists the upload and reads it back. `None` in, `None` out.
    #[instrument(skip(self, file), fields(upload_dir = %self.upload_dir.display()))]
    pub async fn accept(
        &self,
        file: Option<UploadedFile>,
    ) -> Result<Option<ProductImage>, ServiceError> {
        let file = match file {
            Some(file) if !file.is_empty() => file,
            _ => return Ok(None),
        };

        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let path = self
            .upload_dir
            .join(stored_file_name(file.file_name.as_deref(), Utc::now().timestamp_millis()));
        tokio::fs::write(&path, &file.bytes).await?;
        debug!(path = %path.display(), size = file.bytes.len(), "Upload written");

        let data = tokio::fs::read(&path).await?;

        Ok(Some(ProductImage {
            data,
            content_type: IMAGE_CONTENT_TYPE.to_string(),
        }))
    }
}

/// `<millis><.ext>`; the extension is taken from the client's file name, if any.
pub fn stored_file_name(original: Option<&str>, millis: i64) -> String {
    let extension = original
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}{}", millis, extension)
}
