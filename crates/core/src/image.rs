//! Inline image encoding for uploads.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use thiserror::Error;

static IMAGE_SUBTYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("png", "png"),
        ("jpg", "jpeg"),
        ("jpeg", "jpeg"),
        ("gif", "gif"),
        ("webp", "webp"),
    ])
});

/// Failures while preparing an image for upload.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file extension is not a supported image type.
    #[error("unsupported image type for {}", .0.display())]
    UnsupportedType(PathBuf),
    /// The file could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// An image encoded as a self-describing `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Full `data:image/<subtype>;base64,...` URL.
    pub data_url: String,
    /// MIME subtype, e.g. `png`.
    pub subtype: String,
}

impl InlineImage {
    /// Encode raw image bytes with the given MIME subtype.
    pub fn from_bytes(bytes: &[u8], subtype: &str) -> Self {
        let data_url = format!("data:image/{};base64,{}", subtype, STANDARD.encode(bytes));
        Self {
            data_url,
            subtype: subtype.to_string(),
        }
    }

    /// Read and encode an image file. Suspends while the file is read.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let subtype = image_subtype(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(&bytes, subtype))
    }
}

/// Resolve the MIME subtype for an image path from its extension.
pub fn image_subtype(path: &Path) -> Result<&'static str, ImageError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| IMAGE_SUBTYPES.get(ext.as_str()).copied())
        .ok_or_else(|| ImageError::UnsupportedType(path.to_path_buf()))
}
