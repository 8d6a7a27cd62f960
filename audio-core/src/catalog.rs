//! Catalog store
//!
//! The catalog is a single JSON array of [`BookRecord`]s. Every mutation loads
//! the whole document, changes it in memory and rewrites it atomically.

use crate::error::CatalogError;
use crate::storage::{write_atomic, FileStore};
use crate::types::BookRecord;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Durable list of book records
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    #[cfg(test)]
    pub(crate) saves: std::cell::Cell<usize>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            #[cfg(test)]
            saves: std::cell::Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog, distinguishing a missing document (empty) from an
    /// unreadable or corrupted one.
    pub fn try_load(&self) -> CatalogResult<Vec<BookRecord>> {
        match std::fs::read(&self.path) {
            Ok(data) => serde_json::from_slice(&data).map_err(CatalogError::DecodeFailure),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(CatalogError::ReadFailed(e)),
        }
    }

    /// Read the catalog. An unreadable or corrupted document yields an empty list.
    pub fn load(&self) -> Vec<BookRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    catalog = %self.path.display(),
                    error = %e,
                    "Failed to load catalog, treating it as empty"
                );
                Vec::new()
            }
        }
    }

    /// Read the catalog ahead of a rewrite. A corrupted document is replaced,
    /// but one that cannot be read at all is left alone.
    fn load_for_update(&self) -> CatalogResult<Vec<BookRecord>> {
        match self.try_load() {
            Err(CatalogError::DecodeFailure(e)) => {
                tracing::warn!(
                    catalog = %self.path.display(),
                    error = %e,
                    "Corrupted catalog will be overwritten"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Replace the whole document with `records`
    pub fn save(&self, records: &[BookRecord]) -> CatalogResult<()> {
        #[cfg(test)]
        self.saves.set(self.saves.get() + 1);
        let data = serde_json::to_vec_pretty(records).map_err(CatalogError::EncodeFailed)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(CatalogError::WriteFailed)?;
        }
        write_atomic(&self.path, &data).map_err(CatalogError::WriteFailed)
    }

    /// Append a record. Fails if its id is already present.
    pub fn add(&self, record: BookRecord) -> CatalogResult<()> {
        let mut records = self.load_for_update()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        records.push(record);
        self.save(&records)
    }

    /// Replace the record with the same id
    pub fn update(&self, record: BookRecord) -> CatalogResult<()> {
        let mut records = self.load_for_update()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(CatalogError::NotFound(record.id))?;
        *slot = record;
        self.save(&records)
    }

    /// Remove the record with this id. Returns whether one was removed.
    pub fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut records = self.load_for_update()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        self.save(&records)?;
        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<BookRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Add a record for every stored EPUB the catalog does not reference yet.
    /// Membership is decided by the file store key, so repeated runs append nothing.
    /// Returns the number of records added.
    pub fn migrate_orphans(&self, files: &FileStore) -> CatalogResult<usize> {
        let mut records = self.load_for_update()?;
        let known: HashSet<String> = records
            .iter()
            .filter_map(|r| FileStore::key_of(&r.source_file_path).map(str::to_owned))
            .collect();

        let orphans: Vec<BookRecord> = files
            .list_files()
            .into_iter()
            .filter(|path| FileStore::key_of(path).is_some_and(|key| !known.contains(key)))
            .map(BookRecord::for_file)
            .collect();

        let added = orphans.len();
        if added == 0 {
            return Ok(0);
        }
        for orphan in &orphans {
            tracing::info!(id = %orphan.id, file = %orphan.source_file_path.display(), "Migrating orphan EPUB");
        }
        records.extend(orphans);
        self.save(&records)?;
        Ok(added)
    }
}
