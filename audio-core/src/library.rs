//! Library orchestration
//!
//! [`Library`] is the seam a front end talks to. It owns the three stores,
//! keeps an in-memory copy of the catalog that is refreshed after every
//! mutation, and records a status notice for each operation.

use crate::catalog::CatalogStore;
use crate::config::LibraryConfig;
use crate::error::{FileStoreError, LibraryError, Result};
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::status::{Notice, StatusBoard};
use crate::storage::{CoverStore, FileStore};
use crate::types::{file_stem, BookRecord};
use std::path::Path;
use uuid::Uuid;

/// Options for importing a book
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Store a same-named file under a suffixed name instead of rejecting it
    pub allow_duplicate_names: bool,
}

/// An opened library: catalog, EPUB files and covers
pub struct Library {
    config: LibraryConfig,
    catalog: CatalogStore,
    files: FileStore,
    covers: CoverStore,
    books: Vec<BookRecord>,
    status: StatusBoard,
    startup_report: ReconcileReport,
}

impl Library {
    /// Open the library described by `config`, reconciling the catalog with
    /// the files on disk before anything is read.
    pub fn open(config: LibraryConfig) -> Self {
        let catalog = CatalogStore::new(config.catalog_path());
        let files = FileStore::new(config.epub_dir());
        let covers = CoverStore::new(config.cover_dir(), config.cover_quality);
        let status = StatusBoard::new(chrono::Duration::seconds(i64::from(
            config.notice_ttl_secs,
        )));

        let startup_report = Reconciler::new(&catalog, &files, &covers).reconcile();
        tracing::debug!(
            root = %config.root().display(),
            books = startup_report.records.len(),
            "Opened library"
        );

        Self {
            books: startup_report.records.clone(),
            config,
            catalog,
            files,
            covers,
            status,
            startup_report,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn covers(&self) -> &CoverStore {
        &self.covers
    }

    /// What reconciliation did when the library was opened
    pub fn startup_report(&self) -> &ReconcileReport {
        &self.startup_report
    }

    /// Books in catalog order
    pub fn list_books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn get_book(&self, id: Uuid) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Current status notice, if one is still visible
    pub fn notice(&self) -> Option<&Notice> {
        self.status.current()
    }

    pub fn clear_notice(&mut self) {
        self.status.clear();
    }

    /// Reload the catalog, repairing dangling cover references
    pub fn reload(&mut self) {
        self.books = Reconciler::new(&self.catalog, &self.files, &self.covers)
            .repair_covers()
            .records;
    }

    /// Import an EPUB, rejecting a file whose name is already stored
    pub fn import_book(&mut self, source: &Path) -> Result<BookRecord> {
        self.import_book_with(source, ImportOptions::default())
    }

    /// Import an EPUB. The file is copied first; if the catalog append fails
    /// the copy is deleted again.
    pub fn import_book_with(
        &mut self,
        source: &Path,
        options: ImportOptions,
    ) -> Result<BookRecord> {
        let result = self.try_import(source, options);
        self.finish(result, |record| {
            format!(
                "EPUB imported successfully: {}",
                display_name(source, &record.source_file_path)
            )
        })
    }

    fn try_import(&self, source: &Path, options: ImportOptions) -> Result<BookRecord> {
        if !options.allow_duplicate_names {
            if let Some(name) = FileStore::key_of(source) {
                if self.files.is_duplicate_name(name) {
                    return Err(FileStoreError::DuplicateFile(name.to_string()).into());
                }
            }
        }

        let saved = self
            .files
            .save_file(source, options.allow_duplicate_names)?;

        let mut record = BookRecord::for_file(&saved);
        record.title = file_stem(source);

        if let Err(e) = self.catalog.add(record.clone()) {
            tracing::warn!(
                file = %saved.display(),
                error = %e,
                "Catalog append failed, removing copied file"
            );
            if let Err(cleanup) = self.files.delete_file(&saved) {
                tracing::error!(file = %saved.display(), error = %cleanup, "Failed to roll back copied file");
            }
            return Err(e.into());
        }

        Ok(record)
    }

    /// Set or clear (with an empty title) the custom display title
    pub fn rename_book(&mut self, id: Uuid, new_title: &str) -> Result<BookRecord> {
        let result = self.try_rename(id, new_title);
        self.finish(result, |record| match &record.custom_title {
            Some(title) => format!("Renamed book to {}", title),
            None => "Cleared custom title".to_string(),
        })
    }

    fn try_rename(&self, id: Uuid, new_title: &str) -> Result<BookRecord> {
        let mut record = self.catalog.get(id).ok_or(LibraryError::NotFound(id))?;
        record.custom_title = (!new_title.is_empty()).then(|| new_title.to_string());
        self.catalog.update(record.clone())?;
        Ok(record)
    }

    /// Store `image_bytes` as the book's cover and record its location
    pub fn set_cover(&mut self, id: Uuid, image_bytes: &[u8]) -> Result<BookRecord> {
        let result = self.try_set_cover(id, image_bytes);
        self.finish(result, |_| "Cover updated".to_string())
    }

    fn try_set_cover(&self, id: Uuid, image_bytes: &[u8]) -> Result<BookRecord> {
        let mut record = self.catalog.get(id).ok_or(LibraryError::NotFound(id))?;
        let cover = self.covers.save(id, image_bytes)?;
        record.cover_image_path = Some(cover);
        self.catalog.update(record.clone())?;
        Ok(record)
    }

    /// Delete the EPUB, the cover and the catalog entry, in that order.
    /// File and cover removal are best-effort; the catalog entry is always removed.
    pub fn delete_book(&mut self, id: Uuid) -> Result<BookRecord> {
        let result = self.try_delete(id);
        self.finish(result, |record| format!("Deleted {}", record.display_title()))
    }

    fn try_delete(&self, id: Uuid) -> Result<BookRecord> {
        let record = self.catalog.get(id).ok_or(LibraryError::NotFound(id))?;

        match self.files.delete_file(&record.source_file_path) {
            Ok(()) => {}
            Err(FileStoreError::FileNotFound(path)) => {
                tracing::debug!(%id, file = %path.display(), "EPUB already gone")
            }
            Err(e) => tracing::warn!(%id, error = %e, "Failed to delete EPUB, continuing"),
        }
        self.covers.delete(id);
        self.catalog.delete(id)?;
        Ok(record)
    }

    /// Post the outcome of an operation and refresh the in-memory catalog
    fn finish<T>(&mut self, result: Result<T>, success: impl FnOnce(&T) -> String) -> Result<T> {
        match &result {
            Ok(value) => {
                let message = success(value);
                tracing::debug!("{}", message);
                self.status.success(message);
                self.reload();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Library operation failed");
                self.status.error(e.to_string());
            }
        }
        result
    }
}

/// Name shown for an imported file, falling back to the stored name
fn display_name(source: &Path, stored: &Path) -> String {
    FileStore::key_of(source)
        .or_else(|| FileStore::key_of(stored))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::status::NoticeLevel;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn open(root: &TempDir) -> Library {
        Library::open(LibraryConfig::new(root.path().join("library")))
    }

    fn epub(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"epub bytes").unwrap();
        path
    }

    #[test]
    fn test_import_posts_notice() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);

        let record = library.import_book(&epub(&sources, "mybook.epub")).unwrap();

        assert_eq!(record.title, "mybook");
        assert_eq!(library.list_books(), &[record.clone()]);
        let notice = library.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "EPUB imported successfully: mybook.epub");
    }

    #[test]
    fn test_duplicate_import_posts_error() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);
        let source = epub(&sources, "mybook.epub");

        library.import_book(&source).unwrap();
        let err = library.import_book(&source).unwrap_err();

        assert!(matches!(
            err,
            LibraryError::File(FileStoreError::DuplicateFile(_))
        ));
        assert_eq!(library.list_books().len(), 1);
        assert_eq!(library.notice().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_import_allowing_duplicates_keeps_title() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);
        let source = epub(&sources, "mybook.epub");
        let options = ImportOptions {
            allow_duplicate_names: true,
        };

        library.import_book_with(&source, options).unwrap();
        let second = library.import_book_with(&source, options).unwrap();

        assert_eq!(second.title, "mybook");
        assert_eq!(second.file_stem(), "mybook_1");
        assert_eq!(library.list_books().len(), 2);
    }

    #[test]
    fn test_import_rolls_back_file_when_catalog_write_fails() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);

        // A directory at the staging path makes the catalog write fail
        let catalog_path = library.catalog().path().to_path_buf();
        std::fs::create_dir_all(catalog_path.with_file_name(".metadata.json.tmp")).unwrap();

        let err = library
            .import_book(&epub(&sources, "rollback.epub"))
            .unwrap_err();

        assert!(matches!(
            err,
            LibraryError::Catalog(CatalogError::WriteFailed(_))
        ));
        assert!(library.files().list_files().is_empty());
        assert!(!catalog_path.exists());
    }

    #[test]
    fn test_import_rolls_back_file_when_catalog_is_unreadable() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);

        // A directory where the catalog document should be cannot be read
        std::fs::create_dir_all(library.catalog().path()).unwrap();
        std::fs::write(library.catalog().path().join("keep"), b"x").unwrap();

        let err = library
            .import_book(&epub(&sources, "rollback.epub"))
            .unwrap_err();

        assert!(matches!(
            err,
            LibraryError::Catalog(CatalogError::ReadFailed(_))
        ));
        assert!(library.files().list_files().is_empty());
        assert!(library.catalog().path().join("keep").exists());
    }

    #[test]
    fn test_long_notice_lifetime() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut config = LibraryConfig::new(root.path().join("library"));
        config.notice_ttl_secs = u32::MAX;
        let mut library = Library::open(config);

        library.import_book(&epub(&sources, "mybook.epub")).unwrap();
        assert_eq!(
            library.notice().unwrap().message,
            "EPUB imported successfully: mybook.epub"
        );
    }

    #[test]
    fn test_rename_sets_and_clears() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);
        let id = library.import_book(&epub(&sources, "plain.epub")).unwrap().id;

        library.rename_book(id, "Fancy Title").unwrap();
        assert_eq!(library.get_book(id).unwrap().display_title(), "Fancy Title");
        assert_eq!(library.notice().unwrap().message, "Renamed book to Fancy Title");

        library.rename_book(id, "").unwrap();
        let record = library.get_book(id).unwrap();
        assert!(record.custom_title.is_none());
        assert_eq!(record.display_title(), "plain");
    }

    #[test]
    fn test_unknown_id() {
        let root = TempDir::new().unwrap();
        let mut library = open(&root);
        let id = Uuid::new_v4();

        assert!(matches!(
            library.rename_book(id, "x"),
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.delete_book(id),
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.set_cover(id, b"irrelevant"),
            Err(LibraryError::NotFound(_))
        ));
        assert!(!library.covers().exists(id));
    }

    #[test]
    fn test_delete_tolerates_missing_file() {
        let root = TempDir::new().unwrap();
        let sources = TempDir::new().unwrap();
        let mut library = open(&root);
        let record = library.import_book(&epub(&sources, "lost.epub")).unwrap();
        std::fs::remove_file(&record.source_file_path).unwrap();

        library.delete_book(record.id).unwrap();

        assert!(library.list_books().is_empty());
        assert!(library.catalog().get(record.id).is_none());
    }

    #[test]
    fn test_open_migrates_existing_files() {
        let root = TempDir::new().unwrap();
        let config = LibraryConfig::new(root.path().join("library"));
        std::fs::create_dir_all(config.epub_dir()).unwrap();
        std::fs::write(config.epub_dir().join("preexisting.epub"), b"x").unwrap();

        let library = Library::open(config);

        assert_eq!(library.startup_report().orphans_migrated, 1);
        assert_eq!(library.list_books()[0].display_title(), "preexisting");
    }
}
