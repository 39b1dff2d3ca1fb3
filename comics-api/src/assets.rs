//! Image asset storage
//!
//! Base64 image payloads are decoded and written below
//! `<assets_dir>/<image_dir>/`; comics only keep the relative reference
//! `<image_dir>/<file>`, which is also the path the file is served under.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ComicsConfig;

const DEFAULT_EXTENSION: &str = "bin";

#[derive(Debug, Error)]
pub enum AssetError {
    /// The payload is not valid base64
    #[error("Image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded bytes could not be written
    #[error("Failed to write image to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of resolving an `image` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredImage {
    /// The value already referenced a stored asset
    Existing(String),
    /// A new file was written for this request
    Written(String),
}

impl StoredImage {
    pub fn reference(&self) -> &str {
        match self {
            Self::Existing(reference) | Self::Written(reference) => reference,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    assets_dir: PathBuf,
    image_dir: String,
}

impl AssetStore {
    pub fn new(assets_dir: impl Into<PathBuf>, image_dir: impl Into<String>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            image_dir: image_dir.into().trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ComicsConfig) -> Self {
        Self::new(&config.assets_dir, &config.image_dir)
    }

    /// Directory assets are served from
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// True when `value` names an asset under the image directory
    pub fn is_reference(&self, value: &str) -> bool {
        value
            .strip_prefix(&self.image_dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|file| !file.is_empty() && !file.contains('/'))
    }

    /// Keep an existing reference, or decode and write a base64 payload
    pub async fn resolve(&self, value: &str) -> Result<StoredImage, AssetError> {
        let value = value.trim();
        if self.is_reference(value) {
            return Ok(StoredImage::Existing(value.to_string()));
        }
        self.store(value).await.map(StoredImage::Written)
    }

    /// Decode `payload` and write it, returning the new reference
    ///
    /// Accepts raw base64 or a `data:<mime>;base64,<data>` URL; the MIME
    /// subtype picks the file extension.
    pub async fn store(&self, payload: &str) -> Result<String, AssetError> {
        let (extension, data) = split_data_url(payload);
        let bytes = STANDARD.decode(data)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let dir = self.assets_dir.join(&self.image_dir);
        let path = dir.join(&file_name);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| AssetError::Write {
                path: dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| AssetError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Image stored");
        Ok(format!("{}/{}", self.image_dir, file_name))
    }

    /// Remove a stored asset; failures are logged and otherwise ignored
    pub async fn remove(&self, reference: &str) {
        if !self.is_reference(reference) {
            return;
        }
        let path = self.assets_dir.join(reference);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove image");
        }
    }
}

/// Split an optional data-URL header from the base64 body
fn split_data_url(payload: &str) -> (String, &str) {
    let payload = payload.trim();
    let Some(rest) = payload.strip_prefix("data:") else {
        return (DEFAULT_EXTENSION.to_string(), payload);
    };
    let Some((header, data)) = rest.split_once(',') else {
        return (DEFAULT_EXTENSION.to_string(), payload);
    };

    let mime = header.split(';').next().unwrap_or_default();
    let extension = mime
        .split_once('/')
        .map(|(_, subtype)| subtype.split('+').next().unwrap_or_default())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase);

    (extension, data)
}
