//! Headless image provider
//!
//! Decodes images with the `image` crate and keeps the pixels in memory.
//! Used for windowless runs and tests, where no GPU texture exists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use tracing::debug;

use super::{read_bytes, AssetError, ImageHandle, ImageId, ImageProvider, SourceRect};

/// Decoded images, indexed by [`ImageId`]
#[derive(Debug, Default)]
pub struct DecodedImages {
    images: Vec<RgbaImage>,
    /// Path -> id cache so shared sheets decode once
    by_path: HashMap<PathBuf, ImageId>,
}

impl DecodedImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct images decoded so far
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pixels of a loaded image
    pub fn get(&self, id: ImageId) -> Option<&RgbaImage> {
        self.images.get(id.0 as usize)
    }

    /// Copy a region out of a loaded image.
    /// Returns None if the region is not fully inside the image.
    pub fn crop(&self, id: ImageId, rect: SourceRect) -> Option<RgbaImage> {
        let img = self.get(id)?;
        let right = rect.x.checked_add(rect.w)?;
        let bottom = rect.y.checked_add(rect.h)?;
        if right > img.width() || bottom > img.height() {
            return None;
        }
        Some(imageops::crop_imm(img, rect.x, rect.y, rect.w, rect.h).to_image())
    }
}

impl ImageProvider for DecodedImages {
    fn load_image(&mut self, path: &Path) -> Result<ImageHandle, AssetError> {
        if let Some(&id) = self.by_path.get(path) {
            let img = &self.images[id.0 as usize];
            return Ok(ImageHandle::new(id, img.width(), img.height()));
        }

        let bytes = read_bytes(path)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::decode(path, e))?
            .to_rgba8();

        let id = ImageId(self.images.len() as u32);
        let handle = ImageHandle::new(id, img.width(), img.height());
        debug!(path = %path.display(), width = img.width(), height = img.height(), "decoded image");
        self.images.push(img);
        self.by_path.insert(path.to_path_buf(), id);
        Ok(handle)
    }
}
