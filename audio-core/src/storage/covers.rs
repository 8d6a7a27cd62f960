//! Cover image store
//!
//! One JPEG per book, named after the book id. Because the id alone locates
//! the blob, a cover can be recovered even when the path recorded in the
//! catalog has gone stale.

use super::{ensure_dir, write_atomic};
use crate::error::CoverStoreError;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const COVER_EXTENSION: &str = "jpg";

type StoreResult<T> = std::result::Result<T, CoverStoreError>;

/// Directory of per-book cover images
#[derive(Debug, Clone)]
pub struct CoverStore {
    dir: PathBuf,
    quality: u8,
}

impl CoverStore {
    /// Create a store over the given directory, encoding covers at `quality`
    pub fn new(dir: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            dir: dir.into(),
            quality,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Re-encode `image_bytes` as JPEG and store it as the cover for `book_id`,
    /// replacing any previous cover. Returns the cover's path.
    pub fn save(&self, book_id: Uuid, image_bytes: &[u8]) -> StoreResult<PathBuf> {
        let decoded = image::load_from_memory(image_bytes).map_err(CoverStoreError::InvalidImage)?;
        let rgb = decoded.to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(CoverStoreError::EncodeFailed)?;

        ensure_dir(&self.dir).map_err(|source| CoverStoreError::DirectoryUnavailable {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(book_id);
        write_atomic(&path, &jpeg).map_err(CoverStoreError::WriteFailed)?;

        tracing::debug!(%book_id, cover = %path.display(), bytes = jpeg.len(), "Saved cover");
        Ok(path)
    }

    /// Path of the cover for `book_id`, if one is stored.
    /// Covers written under the uppercase id by older libraries are found too.
    pub fn locate(&self, book_id: Uuid) -> Option<PathBuf> {
        self.candidate_paths(book_id)
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Remove the cover for `book_id`. Absence is not an error.
    pub fn delete(&self, book_id: Uuid) {
        for path in self.candidate_paths(book_id) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(%book_id, cover = %path.display(), "Deleted cover"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(%book_id, error = %e, "Failed to delete cover"),
            }
        }
    }

    pub fn exists(&self, book_id: Uuid) -> bool {
        self.locate(book_id).is_some()
    }

    fn path_for(&self, book_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", book_id, COVER_EXTENSION))
    }

    /// Current name first, then the legacy uppercase name
    fn candidate_paths(&self, book_id: Uuid) -> [PathBuf; 2] {
        let mut buffer = Uuid::encode_buffer();
        let upper = book_id.hyphenated().encode_upper(&mut buffer);
        [
            self.path_for(book_id),
            self.dir.join(format!("{}.{}", upper, COVER_EXTENSION)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 6, Rgba([200, 30, 30, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_save_reencodes_as_jpeg() {
        let root = TempDir::new().unwrap();
        let store = CoverStore::new(root.path().join("Covers"), 80);
        let id = Uuid::new_v4();

        let path = store.save(id, &png_bytes()).unwrap();

        assert_eq!(path, root.path().join("Covers").join(format!("{}.jpg", id)));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 6));
    }

    #[test]
    fn test_locate_exists_delete() {
        let root = TempDir::new().unwrap();
        let store = CoverStore::new(root.path().join("Covers"), 80);
        let id = Uuid::new_v4();

        assert!(store.locate(id).is_none());
        assert!(!store.exists(id));

        let path = store.save(id, &png_bytes()).unwrap();
        assert_eq!(store.locate(id), Some(path));
        assert!(store.exists(id));

        store.delete(id);
        assert!(!store.exists(id));

        // Second delete is a no-op
        store.delete(id);
    }

    #[test]
    fn test_save_overwrites_previous_cover() {
        let root = TempDir::new().unwrap();
        let store = CoverStore::new(root.path().join("Covers"), 80);
        let id = Uuid::new_v4();

        let first = store.save(id, &png_bytes()).unwrap();
        let second = store.save(id, &png_bytes()).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(store.directory()).unwrap().count(), 1);
    }

    #[test]
    fn test_uppercase_cover_is_located_and_deleted() {
        let root = TempDir::new().unwrap();
        let store = CoverStore::new(root.path().join("Covers"), 80);
        let id = Uuid::parse_str("6f1c3c1e-3a53-4d0b-9a51-0c7a9f1f2b11").unwrap();
        std::fs::create_dir_all(store.directory()).unwrap();
        let legacy = store
            .directory()
            .join("6F1C3C1E-3A53-4D0B-9A51-0C7A9F1F2B11.jpg");
        std::fs::write(&legacy, b"jpeg bytes").unwrap();

        assert_eq!(store.locate(id), Some(legacy.clone()));
        assert!(store.exists(id));

        store.delete(id);
        assert!(!legacy.exists());
        assert!(!store.exists(id));
    }

    #[test]
    fn test_invalid_image() {
        let root = TempDir::new().unwrap();
        let store = CoverStore::new(root.path().join("Covers"), 80);
        let id = Uuid::new_v4();

        let err = store.save(id, b"definitely not an image").unwrap_err();
        assert!(matches!(err, CoverStoreError::InvalidImage(_)));
        assert!(!store.exists(id));
    }
}
