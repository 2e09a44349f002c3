//! Asset path policy
//!
//! Tileset and tilemap documents declare image paths relative to wherever
//! the map editor saved them (`../images/foo.png`, sometimes with Windows
//! separators). Every such path is re-rooted under the asset base directory
//! so a document can never reach outside the asset tree.

use std::path::{Path, PathBuf};

/// Base directory that all declared asset paths are resolved against
#[derive(Debug, Clone)]
pub struct AssetRoot {
    base_dir: PathBuf,
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl AssetRoot {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a declared path under the base directory
    pub fn resolve(&self, declared: &str) -> PathBuf {
        self.base_dir.join(sanitize_relative(declared))
    }
}

/// Normalize separators and drop every segment that could escape a root:
/// `..`, `.`, empty segments, drive prefixes and leading slashes.
pub fn sanitize_relative(declared: &str) -> PathBuf {
    declared
        .replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .filter(|seg| !seg.ends_with(':'))
        .collect()
}
