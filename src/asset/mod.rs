//! Image assets
//!
//! The core never decodes or displays pixels itself. It asks an
//! [`ImageProvider`] for opaque [`ImageHandle`]s, remembers their sizes, and
//! later hands `(handle, region)` pairs to a renderer.
//!
//! - `paths`: confines declared asset paths to the asset tree
//! - `decoded`: headless provider backed by the `image` crate

mod decoded;
mod paths;

pub use decoded::DecodedImages;
pub use paths::{sanitize_relative, AssetRoot};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading an asset from disk
#[derive(Debug, Error)]
pub enum AssetError {
    /// Nothing exists at the resolved path
    #[error("asset not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The file exists but its contents could not be decoded
    #[error("could not decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    /// Any other I/O failure
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Classify an I/O error for `path`
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound { path: path.to_path_buf() }
        } else {
            AssetError::Io { path: path.to_path_buf(), source }
        }
    }

    /// Build a decode error from anything displayable
    pub fn decode(path: &Path, reason: impl std::fmt::Display) -> Self {
        AssetError::Decode { path: path.to_path_buf(), reason: reason.to_string() }
    }
}

/// Read a whole file, mapping failures onto [`AssetError`]
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| AssetError::from_io(path, e))
}

/// Provider-assigned identifier of a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// A loaded image as the core sees it: an id plus its pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn new(id: ImageId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Region covering the whole image
    pub fn full_rect(&self) -> SourceRect {
        SourceRect::new(0, 0, self.width, self.height)
    }
}

/// A sub-rectangle of an image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SourceRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Host-side image loading.
///
/// Called only while a world is being built; the returned handle stays valid
/// for the lifetime of the provider.
pub trait ImageProvider {
    /// Load (or fetch from cache) the image at `path`
    fn load_image(&mut self, path: &Path) -> Result<ImageHandle, AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = read_bytes(&path).unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_full_rect() {
        let handle = ImageHandle::new(ImageId(3), 32, 48);
        assert_eq!(handle.full_rect(), SourceRect::new(0, 0, 32, 48));
    }
}
