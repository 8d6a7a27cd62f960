//! On-disk stores for EPUB files and cover images

mod covers;
mod files;

pub use covers::CoverStore;
pub use files::{FileStore, EPUB_EXTENSION};

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Extract a plain file name from a path, rejecting anything that could escape a flat directory
pub(crate) fn plain_file_name(path: &Path) -> Option<&str> {
    let mut components = Path::new(path.file_name()?).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => name.to_str(),
        _ => None,
    }
}

/// Hidden sibling used as the staging file for an atomic write
pub(crate) fn staging_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = target.file_name() {
        name.push(file_name);
    }
    name.push(".tmp");
    target.with_file_name(name)
}

/// Write data to a temp file in the same directory, then rename over the target.
/// The temp file is removed if either step fails.
pub(crate) fn write_atomic(target: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = staging_path(target);
    let result = std::fs::write(&temp_path, data).and_then(|_| std::fs::rename(&temp_path, target));
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

/// Create a directory (and parents) if it is not already present
pub(crate) fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
}
