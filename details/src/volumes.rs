//! Book details derived from a volumes search document, the shape returned by
//! the Google Books `volumes?q=isbn:` query.

use crate::book::BookInfo;
use serde::Deserialize;
use shared::ProductId;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum VolumesError {
    #[error("failed to read volumes file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed volumes document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("volumes document has no items")]
    NoItems,
    #[error("volume has no authors")]
    NoAuthors,
}

#[derive(Deserialize, Debug)]
struct BookVolumes {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct VolumeInfo {
    language: String,
    print_type: String,
    industry_identifiers: Vec<IndustryIdentifier>,
    authors: Vec<String>,
    published_date: String,
    page_count: u32,
    publisher: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

impl VolumeInfo {
    fn isbn(&self, kind: &str) -> String {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.clone())
            .unwrap_or_default()
    }
}

/// Builds the book record for `id` from the first volume in `document`.
pub fn parse_volumes(id: ProductId, document: &[u8]) -> Result<BookInfo, VolumesError> {
    let volumes: BookVolumes = serde_json::from_slice(document)?;
    let book = volumes
        .items
        .into_iter()
        .next()
        .ok_or(VolumesError::NoItems)?
        .volume_info;
    let author = book.authors.first().cloned().ok_or(VolumesError::NoAuthors)?;

    let book_type = match book.print_type.as_str() {
        "BOOK" => "paperback",
        _ => "unknown",
    };
    let language = match book.language.as_str() {
        "en" => "English",
        _ => "unknown",
    };

    Ok(BookInfo {
        id,
        author,
        year: book.published_date.clone(),
        book_type: book_type.into(),
        page_count: book.page_count,
        publisher: book.publisher.clone(),
        language: language.into(),
        isbn_10: book.isbn("ISBN_10"),
        isbn_13: book.isbn("ISBN_13"),
    })
}

pub async fn load_volumes(id: ProductId, path: &Path) -> Result<BookInfo, VolumesError> {
    let document = tokio::fs::read(path).await?;
    parse_volumes(id, &document)
}
