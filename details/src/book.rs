use serde::Serialize;
use shared::ProductId;

/// Book record served by `GET /details/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    pub id: ProductId,
    pub author: String,
    pub year: String,
    #[serde(rename = "type")]
    pub book_type: String,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
    pub publisher: String,
    pub language: String,
    #[serde(rename = "ISBN-10")]
    pub isbn_10: String,
    #[serde(rename = "ISBN-13")]
    pub isbn_13: String,
}

impl BookInfo {
    /// The built-in record. Only the id varies.
    pub fn builtin(id: ProductId) -> Self {
        BookInfo {
            id,
            author: "William Shakespeare".into(),
            year: "1595".into(),
            book_type: "paperback".into(),
            page_count: 200,
            publisher: "PublisherA".into(),
            language: "English".into(),
            isbn_10: "1234567890".into(),
            isbn_13: "123-1234567890".into(),
        }
    }
}
