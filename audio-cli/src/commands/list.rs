//! List command implementation

use anyhow::Result;
use audio_core::Library;
use serde::Serialize;

/// Book row output
#[derive(Serialize)]
struct BookRow {
    id: String,
    title: String,
    author: Option<String>,
    file: String,
    has_cover: bool,
    imported_at: String,
}

/// Print the books in catalog order
pub fn list(library: &Library, json: bool) -> Result<()> {
    let rows: Vec<BookRow> = library
        .list_books()
        .iter()
        .map(|book| BookRow {
            id: book.id.to_string(),
            title: book.display_title(),
            author: book.author.clone(),
            file: book
                .source_file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            has_cover: book.has_cover(),
            imported_at: book.import_timestamp.to_rfc3339(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Library is empty");
        return Ok(());
    }
    for row in &rows {
        let cover = if row.has_cover { " [cover]" } else { "" };
        match &row.author {
            Some(author) => println!("{}  {} - {}{}", row.id, row.title, author, cover),
            None => println!("{}  {}{}", row.id, row.title, cover),
        }
    }
    Ok(())
}
