//! Error types for AudIO Core

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using LibraryError
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Top-level error type for all library operations
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    File(#[from] FileStoreError),

    #[error(transparent)]
    Cover(#[from] CoverStoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Book not found: {0}")]
    NotFound(Uuid),
}

/// Errors raised by the EPUB file store
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("EPUB directory unavailable at {}: {}", .path.display(), .source)]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A file with the name '{0}' already exists. Please rename the file or choose a different one.")]
    DuplicateFile(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid source file: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("Failed to copy file '{name}': {source}")]
    CopyFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {}: {}", .path.display(), .source)]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the cover image store
#[derive(Debug, Error)]
pub enum CoverStoreError {
    #[error("Cover directory unavailable at {}: {}", .path.display(), .source)]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid image data: {0}")]
    InvalidImage(#[source] image::ImageError),

    #[error("Failed to encode cover image: {0}")]
    EncodeFailed(#[source] image::ImageError),

    #[error("Failed to save cover image: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors raised by the metadata catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read metadata: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Invalid metadata format: {0}")]
    DecodeFailure(#[source] serde_json::Error),

    #[error("Failed to encode metadata: {0}")]
    EncodeFailed(#[source] serde_json::Error),

    #[error("Failed to save metadata: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Metadata not found: {0}")]
    NotFound(Uuid),

    #[error("Metadata already exists: {0}")]
    DuplicateId(Uuid),
}
