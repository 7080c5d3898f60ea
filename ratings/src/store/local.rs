use super::{ProductRatings, RatingStore, StoreError};
use async_trait::async_trait;
use shared::ProductId;

/// Ratings compiled into the service. Every product gets the same scores.
pub struct StaticRatingStore;

impl StaticRatingStore {
    pub const RATINGS: ProductRatings = ProductRatings {
        reviewer1: 5,
        reviewer2: 4,
    };
}

#[async_trait]
impl RatingStore for StaticRatingStore {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_two_ratings(
        &self,
        _product_id: ProductId,
    ) -> Result<ProductRatings, StoreError> {
        Ok(Self::RATINGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_ratings() {
        for id in [0, 1, 42] {
            let ratings = StaticRatingStore.fetch_two_ratings(id).await.unwrap();
            assert_eq!(ratings.reviewer1, 5);
            assert_eq!(ratings.reviewer2, 4);
        }
    }
}
