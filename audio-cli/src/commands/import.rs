//! Import command implementation

use super::print_notice;
use anyhow::{Context, Result};
use audio_core::{ImportOptions, Library};
use std::path::Path;

/// Copy an EPUB into the library and add it to the catalog
pub fn import(library: &mut Library, input: &Path, allow_duplicates: bool) -> Result<()> {
    let options = ImportOptions {
        allow_duplicate_names: allow_duplicates,
    };
    let result = library.import_book_with(input, options);
    print_notice(library);

    let record = result.with_context(|| format!("Failed to import {}", input.display()))?;
    println!("{}", record.id);
    Ok(())
}
