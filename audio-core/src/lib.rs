//! AudIO Core Library
//!
//! Persistence for an EPUB library: a JSON catalog of imported books, a
//! directory of EPUB files, a directory of per-book cover images, and the
//! reconciliation that keeps the catalog consistent with what is on disk.
//! [`Library`] ties these together for a front end.

pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod reconcile;
pub mod status;
pub mod storage;
pub mod types;

pub use catalog::CatalogStore;
pub use config::LibraryConfig;
pub use error::{CatalogError, CoverStoreError, FileStoreError, LibraryError, Result};
pub use library::{ImportOptions, Library};
pub use reconcile::{ReconcileReport, Reconciler};
pub use status::{Notice, NoticeLevel, StatusBoard};
pub use storage::{CoverStore, FileStore};
pub use types::BookRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = BookRecord::for_file("/library/EPUBs/Test Book.epub");
        assert_eq!(record.display_title(), "Test Book");
    }
}
