use serde::{Deserialize, Serialize};
use shared::ProductId;

pub const REVIEW_TEXTS: [(&str, &str); 2] = [
    (
        "Reviewer1",
        "An extremely entertaining play by Shakespeare. The slapstick humour is refreshing!",
    ),
    (
        "Reviewer2",
        "Absolutely fun and entertaining. The play lacks thematic depth when compared to other plays by Shakespeare.",
    ),
];

pub const RATINGS_UNAVAILABLE: &str = "Ratings service is currently unavailable";

/// Either a star value or an explicit failure marker, never both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Stars { stars: i32, color: String },
    Error { error: String },
}

impl Rating {
    pub fn unavailable() -> Self {
        Rating::Error {
            error: RATINGS_UNAVAILABLE.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSet {
    pub id: ProductId,
    pub podname: String,
    pub clustername: String,
    pub reviewers: Vec<Review>,
}

/// Scores as reported by the ratings service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ReviewerScores {
    #[serde(rename = "Reviewer1")]
    pub reviewer1: i32,
    #[serde(rename = "Reviewer2")]
    pub reviewer2: i32,
}

#[derive(Debug, Deserialize)]
pub struct RatingsResponse {
    pub ratings: ReviewerScores,
}

/// What the reviews service knows about ratings for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RatingsLookup {
    Disabled,
    Found(ReviewerScores),
    Unavailable,
}

impl ReviewSet {
    /// The two canned reviews, with ratings attached according to `lookup`.
    pub fn build(
        id: ProductId,
        podname: &str,
        clustername: &str,
        lookup: &RatingsLookup,
        star_color: &str,
    ) -> Self {
        let ratings: [Option<Rating>; 2] = match lookup {
            RatingsLookup::Disabled => [None, None],
            RatingsLookup::Unavailable => [Some(Rating::unavailable()), Some(Rating::unavailable())],
            RatingsLookup::Found(scores) => [scores.reviewer1, scores.reviewer2].map(|stars| {
                Some(Rating::Stars {
                    stars,
                    color: star_color.to_string(),
                })
            }),
        };

        let reviewers = REVIEW_TEXTS
            .iter()
            .zip(ratings)
            .map(|((reviewer, text), rating)| Review {
                reviewer: reviewer.to_string(),
                text: text.to_string(),
                rating,
            })
            .collect();

        ReviewSet {
            id,
            podname: podname.to_string(),
            clustername: clustername.to_string(),
            reviewers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_ratings_are_omitted() {
        let set = ReviewSet::build(0, "reviews-v1", "", &RatingsLookup::Disabled, "black");
        let json = serde_json::to_value(&set).unwrap();

        assert_eq!(json["id"], 0);
        assert_eq!(json["podname"], "reviews-v1");
        assert_eq!(json["reviewers"].as_array().unwrap().len(), 2);
        for reviewer in json["reviewers"].as_array().unwrap() {
            assert!(reviewer.get("rating").is_none());
        }
    }

    #[test]
    fn test_rating_variants() {
        let stars = Rating::Stars {
            stars: 4,
            color: "red".into(),
        };
        assert_eq!(
            serde_json::to_value(&stars).unwrap(),
            serde_json::json!({"stars": 4, "color": "red"})
        );
        assert_eq!(
            serde_json::to_value(Rating::unavailable()).unwrap(),
            serde_json::json!({"error": "Ratings service is currently unavailable"})
        );

        let parsed: Rating = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert_eq!(parsed, Rating::Error { error: "x".into() });
    }

    #[test]
    fn test_found_scores_keep_reviewer_order() {
        let lookup = RatingsLookup::Found(ReviewerScores {
            reviewer1: 1,
            reviewer2: 3,
        });
        let set = ReviewSet::build(2, "", "", &lookup, "black");

        assert_eq!(set.reviewers[0].reviewer, "Reviewer1");
        assert_eq!(
            set.reviewers[0].rating,
            Some(Rating::Stars {
                stars: 1,
                color: "black".into()
            })
        );
        assert_eq!(set.reviewers[1].reviewer, "Reviewer2");
        assert_eq!(
            set.reviewers[1].rating,
            Some(Rating::Stars {
                stars: 3,
                color: "black".into()
            })
        );
    }
}
