//! Rename, cover and delete command implementations

use super::print_notice;
use anyhow::{Context, Result};
use audio_core::Library;
use std::path::Path;
use uuid::Uuid;

/// Set or clear a book's custom title
pub fn rename(library: &mut Library, id: Uuid, title: &str) -> Result<()> {
    let result = library.rename_book(id, title);
    print_notice(library);
    result.with_context(|| format!("Failed to rename book {}", id))?;
    Ok(())
}

/// Store an image file as a book's cover
pub fn cover(library: &mut Library, id: Uuid, image: &Path) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image file: {}", image.display()))?;
    let result = library.set_cover(id, &bytes);
    print_notice(library);
    result.with_context(|| format!("Failed to set cover for book {}", id))?;
    Ok(())
}

/// Delete a book with its file and cover
pub fn delete(library: &mut Library, id: Uuid) -> Result<()> {
    let result = library.delete_book(id);
    print_notice(library);
    result.with_context(|| format!("Failed to delete book {}", id))?;
    Ok(())
}
