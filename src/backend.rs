use image::RgbaImage;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::RemovalMethod;

/// Error raised by an external background-removal backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend is wired into this build.
    #[error("no background-removal backend is available")]
    Unavailable,
    /// The backend ran and failed.
    #[error("background removal backend failed: {0}")]
    Failed(String),
}

/// An external collaborator that can separate a subject from its background.
///
/// Implementations receive the original-resolution buffer and return an RGBA
/// image whose alpha channel masks the background out. A failing or absent
/// backend routes removal through the threshold fallback instead.
pub trait MatteBackend {
    fn segment(&self, image: &RgbaImage) -> Result<RgbaImage, BackendError>;

    /// Whether the backend can be expected to succeed at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when no collaborator is configured; always fails, which
/// keeps the core free of conditional backend paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl MatteBackend for UnavailableBackend {
    fn segment(&self, _image: &RgbaImage) -> Result<RgbaImage, BackendError> {
        Err(BackendError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Content identity of a source image plus the removal method that produced
/// the cached result.
pub type CacheKey = ([u8; 32], RemovalMethod);

/// Single-entry cache for backend results.
///
/// Backend inference is the slowest step of a reprocess; parameter changes
/// that leave the matte unchanged (scale, dpi, export settings) must not
/// re-run it. The key changes whenever the source image or the method does,
/// which invalidates the entry.
#[derive(Debug, Clone, Default)]
pub struct BackendCache {
    entry: Option<(CacheKey, RgbaImage)>,
}

impl BackendCache {
    /// Derive the cache key for an image and method.
    pub fn key(image: &RgbaImage, method: RemovalMethod) -> CacheKey {
        let (w, h) = image.dimensions();
        let mut hasher = Sha256::new();
        hasher.update(w.to_le_bytes());
        hasher.update(h.to_le_bytes());
        hasher.update(image.as_raw());
        (hasher.finalize().into(), method)
    }

    /// Return a copy of the cached result when the key matches.
    pub fn get(&self, key: &CacheKey) -> Option<RgbaImage> {
        self.entry
            .as_ref()
            .and_then(|(stored, image)| (stored == key).then(|| image.clone()))
    }

    pub fn put(&mut self, key: CacheKey, image: RgbaImage) {
        self.entry = Some((key, image));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
