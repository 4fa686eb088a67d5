//! QR code generation for equipment items.
//!
//! Each item gets one PNG under `<static_dir>/qrcodes/<id>.png` encoding the
//! URL of its detail page. The web server serves `static_dir` under
//! `/static`, so the stored relative path doubles as the image URL suffix.

use std::path::{Path, PathBuf};

use image::Luma;
use qrcode::types::QrError;
use qrcode::QrCode;
use thiserror::Error;
use uuid::Uuid;

/// Sub-directory of the static directory holding generated images.
pub const QR_CODES_DIR: &str = "qrcodes";

/// Smallest edge length of a generated image, in pixels.
const MIN_IMAGE_SIZE: u32 = 240;

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] QrError),

    #[error("failed to create QR code directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write QR code image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Renders and stores scannable codes for items.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    static_dir: PathBuf,
    base_url: String,
}

impl CodeGenerator {
    /// `base_url` is the externally reachable root of the web app, e.g.
    /// `http://192.168.1.10:3000`. A trailing slash is ignored.
    pub fn new(static_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            static_dir: static_dir.into(),
            base_url,
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// URL of the item's detail page; this is what the code encodes.
    pub fn item_url(&self, id: Uuid) -> String {
        format!("{}/item/{}", self.base_url, id)
    }

    /// Path of the image relative to the static directory.
    pub fn relative_path(id: Uuid) -> String {
        format!("{}/{}.png", QR_CODES_DIR, id)
    }

    /// Absolute location of the image on disk.
    pub fn image_path(&self, id: Uuid) -> PathBuf {
        self.static_dir.join(Self::relative_path(id))
    }

    /// Render the code for `id` and write it to disk.
    ///
    /// Returns the path relative to the static directory.
    pub fn generate(&self, id: Uuid) -> Result<String, CodeError> {
        let url = self.item_url(id);
        let code = QrCode::new(url.as_bytes())?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(MIN_IMAGE_SIZE, MIN_IMAGE_SIZE)
            .build();

        let dir = self.static_dir.join(QR_CODES_DIR);
        std::fs::create_dir_all(&dir).map_err(|source| CodeError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.image_path(id);
        image.save(&path).map_err(|source| CodeError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote QR code for {} to {}", id, path.display());
        Ok(Self::relative_path(id))
    }

    /// Remove the image for `id`, ignoring a missing file.
    ///
    /// Used when the item it was generated for could not be stored.
    pub fn discard(&self, id: Uuid) {
        let path = self.image_path(id);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove QR code {}: {}", path.display(), e);
            }
        }
    }
}
