use serde::{Deserialize, Serialize};
use shared::ProductId;

pub const DETAILS_UNAVAILABLE: &str = "Sorry, product details are currently unavailable for this book.";
pub const REVIEWS_UNAVAILABLE: &str = "Sorry, product reviews are currently unavailable for this book.";
pub const RATINGS_UNAVAILABLE: &str = "Sorry, product ratings are currently unavailable for this book.";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Product {
    #[serde(rename = "productId")]
    pub id: ProductId,
    pub title: String,
    #[serde(rename = "descriptionHtml")]
    pub description_html: String,
}

pub fn products() -> Vec<Product> {
    vec![Product {
        id: 0,
        title: "The Comedy of Errors".into(),
        description_html: "<a href='https://en.wikipedia.org/wiki/The_Comedy_of_Errors'>Wikipedia Summary</a>: \
            The Comedy of Errors is one of <b>William Shakespeare's</b> early plays. It is his shortest and one \
            of his most farcical comedies, with a major part of the humour coming from slapstick and mistaken \
            identity, in addition to puns and word play."
            .into(),
    }]
}

/// The catalogue entry for `id`, or an empty product when there is none.
pub fn get_product(id: ProductId) -> Product {
    products()
        .into_iter()
        .find(|product| product.id == id)
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Stars { stars: i32, color: String },
    Error { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReviews {
    pub id: ProductId,
    #[serde(default)]
    pub podname: String,
    #[serde(default)]
    pub clustername: String,
    pub reviewers: Vec<Review>,
}

/// A section of the composite result: the record, or why it is missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Available(T),
    Error { error: String },
}

impl<T> Section<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Section::Error {
            error: message.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }
}

/// Everything the product page shows for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompositeResult {
    #[serde(rename = "detailsStatus")]
    pub details_status: u16,
    #[serde(rename = "reviewsStatus")]
    pub reviews_status: u16,
    pub product: Product,
    pub details: Section<BookDetails>,
    pub reviews: Section<ProductReviews>,
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_product() {
        assert_eq!(get_product(0).title, "The Comedy of Errors");
        assert_eq!(get_product(1), Product::default());
        assert_eq!(get_product(-1), Product::default());
    }

    #[test]
    fn test_section_parsing() {
        let error: Section<BookDetails> =
            serde_json::from_str(r#"{"error": "failed to read volumes file"}"#).unwrap();
        assert_eq!(error, Section::error("failed to read volumes file"));

        let reviews: Section<ProductReviews> = serde_json::from_str(
            r#"{"id": 0, "podname": "p", "clustername": "c", "reviewers": [
                {"reviewer": "Reviewer1", "text": "t1", "rating": {"stars": 5, "color": "black"}},
                {"reviewer": "Reviewer2", "text": "t2"}
            ]}"#,
        )
        .unwrap();
        let Section::Available(reviews) = reviews else {
            panic!("expected reviews");
        };
        assert_eq!(
            reviews.reviewers[0].rating,
            Some(Rating::Stars {
                stars: 5,
                color: "black".into()
            })
        );
        assert_eq!(reviews.reviewers[1].rating, None);
    }

    #[test]
    fn test_composite_wire_format() {
        let result = CompositeResult {
            details_status: 500,
            reviews_status: 200,
            product: get_product(0),
            details: Section::error(DETAILS_UNAVAILABLE),
            reviews: Section::Available(ProductReviews {
                id: 0,
                podname: String::new(),
                clustername: String::new(),
                reviewers: vec![],
            }),
            user: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["detailsStatus"], 500);
        assert_eq!(json["details"]["error"], DETAILS_UNAVAILABLE);
        assert_eq!(json["product"]["productId"], 0);
        assert_eq!(json["reviews"]["reviewers"], serde_json::json!([]));
        assert!(json["user"].is_null());
    }
}
