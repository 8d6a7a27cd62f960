//! EPUB file store
//!
//! Owns a flat directory of imported EPUB files. Files are keyed by file name:
//! a handle is any path whose final component names a file in the directory,
//! so handles recorded under an older root still resolve.

use super::{ensure_dir, plain_file_name, staging_path};
use crate::error::FileStoreError;
use std::path::{Path, PathBuf};

/// Extension of the files managed by the store
pub const EPUB_EXTENSION: &str = "epub";

type StoreResult<T> = std::result::Result<T, FileStoreError>;

/// Directory of imported EPUB binaries
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store over the given directory. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Managed directory, created if absent
    pub fn directory(&self) -> StoreResult<&Path> {
        ensure_dir(&self.dir).map_err(|source| FileStoreError::DirectoryUnavailable {
            path: self.dir.clone(),
            source,
        })?;
        Ok(&self.dir)
    }

    /// Copy `source` into the store and return the stored file's path.
    ///
    /// With `allow_duplicate_names` false an existing file of the same name is
    /// an error; otherwise the copy is stored under `<stem>_<n>.epub` with the
    /// first free `n`. The copy is staged under a hidden name and renamed into
    /// place, so a failure never leaves a partial file behind.
    pub fn save_file(&self, source: &Path, allow_duplicate_names: bool) -> StoreResult<PathBuf> {
        let name = plain_file_name(source)
            .ok_or_else(|| FileStoreError::InvalidSource(source.to_path_buf()))?;
        if !has_epub_extension(Path::new(name)) {
            return Err(FileStoreError::UnsupportedExtension(name.to_string()));
        }
        if !source.is_file() {
            return Err(FileStoreError::FileNotFound(source.to_path_buf()));
        }

        let dir = self.directory()?;
        let final_name = if dir.join(name).exists() {
            if !allow_duplicate_names {
                return Err(FileStoreError::DuplicateFile(name.to_string()));
            }
            unique_name(dir, name)
        } else {
            name.to_string()
        };

        let destination = dir.join(&final_name);
        let staged = staging_path(&destination);
        let copied = std::fs::copy(source, &staged)
            .and_then(|_| std::fs::rename(&staged, &destination));
        if let Err(err) = copied {
            let _ = std::fs::remove_file(&staged);
            return Err(FileStoreError::CopyFailed {
                name: final_name,
                source: err,
            });
        }

        tracing::debug!(file = %destination.display(), "Stored EPUB");
        Ok(destination)
    }

    /// All EPUB files in the store, sorted by name. Empty if the directory is unusable.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(dir) = self.directory() else {
            return Vec::new();
        };
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| {
                plain_file_name(path).is_some_and(|name| !name.starts_with('.'))
                    && has_epub_extension(path)
            })
            .collect();
        files.sort();
        files
    }

    /// Remove a stored file
    pub fn delete_file(&self, handle: &Path) -> StoreResult<()> {
        let path = self
            .resolve(handle)
            .ok_or_else(|| FileStoreError::InvalidSource(handle.to_path_buf()))?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(file = %path.display(), "Deleted EPUB");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStoreError::FileNotFound(path))
            }
            Err(source) => Err(FileStoreError::DeleteFailed { path, source }),
        }
    }

    /// Whether the handle names a file present in the store
    pub fn exists(&self, handle: &Path) -> bool {
        self.resolve(handle).is_some_and(|path| path.is_file())
    }

    /// Whether a file with this name is already stored
    pub fn is_duplicate_name(&self, name: &str) -> bool {
        self.exists(Path::new(name))
    }

    /// Location inside the store that a handle refers to
    pub fn resolve(&self, handle: &Path) -> Option<PathBuf> {
        plain_file_name(handle).map(|name| self.dir.join(name))
    }

    /// Storage key (file name) of a handle
    pub fn key_of(handle: &Path) -> Option<&str> {
        plain_file_name(handle)
    }
}

fn has_epub_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EPUB_EXTENSION))
}

/// First `<stem>_<n>.<ext>` name not present in `dir`
fn unique_name(dir: &Path, name: &str) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = format!("{}_{}.{}", stem, counter, ext);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}
