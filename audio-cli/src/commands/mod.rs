//! CLI command implementations

mod edit;
mod import;
mod list;
mod reconcile;

pub use edit::{cover, delete, rename};
pub use import::import;
pub use list::list;
pub use reconcile::reconcile;

use audio_core::{Library, NoticeLevel};

/// Print the success notice left by the last library operation.
/// Failures are reported through the returned error instead.
fn print_notice(library: &Library) {
    if let Some(notice) = library
        .notice()
        .filter(|n| n.level == NoticeLevel::Success)
    {
        println!("{}", notice.message);
    }
}
