//! Startup reconciliation between the catalog and the files on disk
//!
//! Absolute paths recorded in the catalog can go stale when the library root
//! moves (for example an app container path changing across a reinstall).
//! Covers are re-derived from their book id; stored EPUBs the catalog does not
//! know about are migrated in as new records.

use crate::catalog::CatalogStore;
use crate::storage::{CoverStore, FileStore};
use crate::types::BookRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Catalog contents after reconciliation
    pub records: Vec<BookRecord>,

    /// Records whose cover reference was dropped
    pub covers_cleared: usize,

    /// Records whose cover path was rewritten to the cover store location
    pub covers_relinked: usize,

    /// Records added for EPUBs missing from the catalog
    pub orphans_migrated: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.covers_cleared + self.covers_relinked + self.orphans_migrated > 0
    }
}

/// What to do with one record's cover reference
#[derive(Debug, Clone, PartialEq)]
enum CoverRepair {
    Keep,
    Clear,
    Relink(std::path::PathBuf),
}

/// Aligns the catalog with the file and cover stores
pub struct Reconciler<'a> {
    catalog: &'a CatalogStore,
    files: &'a FileStore,
    covers: &'a CoverStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a CatalogStore, files: &'a FileStore, covers: &'a CoverStore) -> Self {
        Self {
            catalog,
            files,
            covers,
        }
    }

    /// Run a full startup pass: cover repair, then orphan migration.
    /// Failures to persist are logged and the in-memory result is still
    /// returned so the library stays readable.
    pub fn reconcile(&self) -> ReconcileReport {
        let mut report = self.repair_covers();
        self.migrate_orphans(&mut report);

        if report.changed() {
            tracing::info!(
                covers_cleared = report.covers_cleared,
                covers_relinked = report.covers_relinked,
                orphans_migrated = report.orphans_migrated,
                "Reconciled catalog"
            );
        }
        report
    }

    /// Load the catalog and fix dangling cover references, saving once if anything changed
    pub fn repair_covers(&self) -> ReconcileReport {
        let mut report = ReconcileReport {
            records: self.catalog.load(),
            ..Default::default()
        };
        self.apply_cover_repairs(&mut report);
        report
    }

    fn apply_cover_repairs(&self, report: &mut ReconcileReport) {
        for record in &mut report.records {
            match self.cover_repair(record) {
                CoverRepair::Keep => {}
                CoverRepair::Clear => {
                    // Lossy: the reference is dropped without proof that the cover is gone for good
                    tracing::warn!(
                        id = %record.id,
                        cover = ?record.cover_image_path,
                        "Cover missing from stored path and cover store, clearing reference"
                    );
                    record.cover_image_path = None;
                    report.covers_cleared += 1;
                }
                CoverRepair::Relink(path) => {
                    tracing::info!(
                        id = %record.id,
                        stale = ?record.cover_image_path,
                        current = %path.display(),
                        "Relinking stale cover path"
                    );
                    record.cover_image_path = Some(path);
                    report.covers_relinked += 1;
                }
            }
        }

        if report.covers_cleared + report.covers_relinked > 0 {
            if let Err(e) = self.catalog.save(&report.records) {
                tracing::error!(error = %e, "Failed to save catalog after cover cleanup");
            }
        }
    }

    fn cover_repair(&self, record: &BookRecord) -> CoverRepair {
        let Some(stored) = record.cover_image_path.as_deref() else {
            return CoverRepair::Keep;
        };
        if stored.exists() {
            return CoverRepair::Keep;
        }
        match self.covers.locate(record.id) {
            Some(current) => CoverRepair::Relink(current),
            None => CoverRepair::Clear,
        }
    }

    fn migrate_orphans(&self, report: &mut ReconcileReport) {
        let known: HashSet<&str> = report
            .records
            .iter()
            .filter_map(|r| FileStore::key_of(&r.source_file_path))
            .collect();
        let needs_migration = self
            .files
            .list_files()
            .iter()
            .any(|path| FileStore::key_of(path).is_some_and(|key| !known.contains(key)));
        if !needs_migration {
            return;
        }

        match self.catalog.migrate_orphans(self.files) {
            Ok(added) => {
                report.orphans_migrated = added;
                report.records = self.catalog.load();
            }
            Err(e) => tracing::error!(error = %e, "Failed to migrate orphan EPUBs"),
        }
    }
}
