//! Core types for the AudIO catalog

mod record;

pub use record::BookRecord;
pub(crate) use record::file_stem;
