//! Library configuration

use std::path::{Path, PathBuf};

/// Environment variable naming the library root directory
pub const LIBRARY_PATH_ENV: &str = "AUDIO_LIBRARY_PATH";

const DEFAULT_LIBRARY_PATH: &str = "./audio_data";
const EPUB_DIR_NAME: &str = "EPUBs";
const COVER_DIR_NAME: &str = "Covers";
const CATALOG_FILE_NAME: &str = "metadata.json";

/// Locations and tunables for a library on disk
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryConfig {
    /// Root directory holding the catalog and both managed directories
    pub root: PathBuf,

    /// JPEG quality used when storing covers (1-100)
    pub cover_quality: u8,

    /// How long a status notice stays visible, in seconds
    pub notice_ttl_secs: u32,
}

impl LibraryConfig {
    /// Create a configuration rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cover_quality: 80,
            notice_ttl_secs: 4,
        }
    }

    /// Build a configuration from `AUDIO_LIBRARY_PATH`, falling back to `./audio_data`
    pub fn from_env() -> Self {
        let root =
            std::env::var(LIBRARY_PATH_ENV).unwrap_or_else(|_| DEFAULT_LIBRARY_PATH.to_string());
        Self::new(root)
    }

    /// Set the JPEG quality for stored covers
    pub fn with_cover_quality(mut self, quality: u8) -> Self {
        self.cover_quality = quality.clamp(1, 100);
        self
    }

    /// Directory of imported EPUB files
    pub fn epub_dir(&self) -> PathBuf {
        self.root.join(EPUB_DIR_NAME)
    }

    /// Directory of cover images
    pub fn cover_dir(&self) -> PathBuf {
        self.root.join(COVER_DIR_NAME)
    }

    /// Path of the catalog document
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE_NAME)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_locations() {
        let config = LibraryConfig::new("/data/library");
        assert_eq!(config.epub_dir(), PathBuf::from("/data/library/EPUBs"));
        assert_eq!(config.cover_dir(), PathBuf::from("/data/library/Covers"));
        assert_eq!(
            config.catalog_path(),
            PathBuf::from("/data/library/metadata.json")
        );
        assert_eq!(config.cover_quality, 80);
    }

    #[test]
    fn test_cover_quality_is_clamped() {
        assert_eq!(LibraryConfig::new("x").with_cover_quality(0).cover_quality, 1);
        assert_eq!(LibraryConfig::new("x").with_cover_quality(200).cover_quality, 100);
    }
}
