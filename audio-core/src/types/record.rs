//! Catalog record for one imported book

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One book's metadata entry in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Stable identifier, assigned at creation
    pub id: Uuid,

    /// Extracted or default title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// User override for the display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,

    /// Location of the EPUB inside the file store
    #[serde(alias = "filePath")]
    pub source_file_path: PathBuf,

    /// Location of the cover inside the cover store; `None` means no cover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_path: Option<PathBuf>,

    #[serde(alias = "importDate")]
    pub import_timestamp: DateTime<Utc>,
}

impl BookRecord {
    /// Create a record for a freshly stored file, titled after its filename
    pub fn for_file(source_file_path: impl Into<PathBuf>) -> Self {
        let source_file_path = source_file_path.into();
        Self {
            id: Uuid::new_v4(),
            title: file_stem(&source_file_path),
            author: None,
            custom_title: None,
            source_file_path,
            cover_image_path: None,
            import_timestamp: Utc::now(),
        }
    }

    /// Custom title if set, otherwise title, otherwise the filename stem
    pub fn display_title(&self) -> String {
        match self.custom_title.as_deref() {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ if !self.title.is_empty() => self.title.clone(),
            _ => self.file_stem(),
        }
    }

    /// Filename of the source EPUB without its extension
    pub fn file_stem(&self) -> String {
        file_stem(&self.source_file_path)
    }

    pub fn has_cover(&self) -> bool {
        self.cover_image_path.is_some()
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_for_file() {
        let record = BookRecord::for_file("/lib/EPUBs/mybook.epub");
        assert_eq!(record.title, "mybook");
        assert!(record.author.is_none());
        assert!(record.custom_title.is_none());
        assert!(!record.has_cover());
    }

    #[test]
    fn test_display_title_precedence() {
        let mut record = BookRecord::for_file("/lib/EPUBs/stem.epub");
        record.title = "Title".to_string();
        assert_eq!(record.display_title(), "Title");

        record.custom_title = Some(String::new());
        assert_eq!(record.display_title(), "Title");

        record.custom_title = Some("Custom".to_string());
        assert_eq!(record.display_title(), "Custom");

        record.custom_title = None;
        record.title = String::new();
        assert_eq!(record.display_title(), "stem");
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let mut record = BookRecord::for_file("/lib/EPUBs/a.epub");
        record.cover_image_path = Some(PathBuf::from("/lib/Covers/x.jpg"));
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("sourceFilePath").is_some());
        assert!(value.get("coverImagePath").is_some());
        assert!(value.get("importTimestamp").is_some());
        // None fields are omitted entirely
        assert!(value.get("customTitle").is_none());
        assert!(value.get("author").is_none());
    }

    #[test]
    fn test_reads_legacy_keys() {
        let json = r#"{
            "id": "6f1c3c1e-3a53-4d0b-9a51-0c7a9f1f2b11",
            "title": "Old",
            "filePath": "/old/EPUBs/Old.epub",
            "importDate": "2026-02-17T10:00:00Z"
        }"#;
        let record: BookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.source_file_path, PathBuf::from("/old/EPUBs/Old.epub"));
        assert!(record.cover_image_path.is_none());
    }

    #[test]
    fn test_record_serialization() {
        let mut record = BookRecord::for_file("/lib/EPUBs/round.epub");
        record.author = Some("Ann Author".to_string());
        record.custom_title = Some("Round Trip".to_string());
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: BookRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
