use crate::metrics_defs::{OVERRIDES_WRITTEN, STORE_FETCHES};
use crate::overrides::RatingOverrides;
use crate::store::{ProductRatings, RatingStore, StoreError};
use serde::Serialize;
use shared::ProductId;
use std::sync::Arc;

/// The `{id, ratings}` record returned by the ratings API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RatingsRecord {
    pub id: ProductId,
    pub ratings: ProductRatings,
}

/// Combines the configured backend with the in-memory overrides.
pub struct RatingService {
    store: Arc<dyn RatingStore>,
    overrides: RatingOverrides,
}

impl RatingService {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self {
            store,
            overrides: RatingOverrides::new(),
        }
    }

    pub async fn fetch(&self, product_id: ProductId) -> Result<RatingsRecord, StoreError> {
        if let Some(ratings) = self.overrides.get(product_id) {
            shared::counter!(STORE_FETCHES, "source" => "override", "outcome" => "success")
                .increment(1);
            return Ok(RatingsRecord {
                id: product_id,
                ratings,
            });
        }

        let result = self.store.fetch_two_ratings(product_id).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        shared::counter!(STORE_FETCHES, "source" => self.store.name(), "outcome" => outcome)
            .increment(1);

        match result {
            Ok(ratings) => Ok(RatingsRecord {
                id: product_id,
                ratings,
            }),
            Err(e) => {
                tracing::error!(store = self.store.name(), product_id, error = %e, "Failed to fetch ratings");
                Err(e)
            }
        }
    }

    /// Records an override and returns the record subsequent fetches will see.
    pub fn submit(&self, product_id: ProductId, ratings: ProductRatings) -> RatingsRecord {
        self.overrides.insert(product_id, ratings);
        shared::counter!(OVERRIDES_WRITTEN).increment(1);
        tracing::debug!(product_id, "Rating override recorded");

        RatingsRecord {
            id: product_id,
            ratings,
        }
    }
}
