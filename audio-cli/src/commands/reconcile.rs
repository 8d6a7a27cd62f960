//! Reconcile command implementation

use anyhow::Result;
use audio_core::Library;

/// Report what reconciliation changed when the library was opened
pub fn reconcile(library: &Library, json: bool) -> Result<()> {
    let report = library.startup_report();

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Books:            {}", report.records.len());
    println!("Covers relinked:  {}", report.covers_relinked);
    println!("Covers cleared:   {}", report.covers_cleared);
    println!("Orphans migrated: {}", report.orphans_migrated);
    Ok(())
}
