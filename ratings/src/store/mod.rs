//! Rating Store Adapter: where the two reviewer scores for a product come from.
//!
//! Exactly one backend is built at startup from [`RatingStoreType`] and never
//! switched afterwards.

mod local;
mod mongo;
mod mysql;

use crate::config::RatingStoreType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::ProductId;
use std::sync::Arc;

pub use local::StaticRatingStore;
pub use mongo::MongoRatingStore;
pub use mysql::MysqlRatingStore;

/// Highest score a reviewer can give. Scores start at 0.
pub const MAX_SCORE: i32 = 5;

/// Scores given by the two fixed reviewers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRatings {
    #[serde(rename = "Reviewer1")]
    pub reviewer1: i32,
    #[serde(rename = "Reviewer2")]
    pub reviewer2: i32,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("could not connect to ratings database: {0}")]
    Connection(String),
    #[error("ratings query failed: {0}")]
    Query(String),
    #[error("expected two ratings, found {0}")]
    MissingRatings(usize),
    #[error("stored rating {0} is not between 0 and 5")]
    InvalidRating(i32),
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// First two ratings in backend order.
    ///
    /// Connections taken for the lookup are returned before this resolves,
    /// whether it succeeds or not.
    async fn fetch_two_ratings(&self, product_id: ProductId)
    -> Result<ProductRatings, StoreError>;
}

/// Normalizes whatever the backend returned into the reviewer pair.
fn first_two(scores: Vec<i32>) -> Result<ProductRatings, StoreError> {
    match scores.as_slice() {
        [first, second, ..] => Ok(ProductRatings {
            reviewer1: checked_score(*first)?,
            reviewer2: checked_score(*second)?,
        }),
        other => Err(StoreError::MissingRatings(other.len())),
    }
}

fn checked_score(score: i32) -> Result<i32, StoreError> {
    if (0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(StoreError::InvalidRating(score))
    }
}

pub async fn get_store(store_type: &RatingStoreType) -> Result<Arc<dyn RatingStore>, StoreError> {
    let store: Arc<dyn RatingStore> = match store_type {
        RatingStoreType::Static => Arc::new(StaticRatingStore),
        RatingStoreType::Mysql {
            url,
            max_connections,
        } => Arc::new(MysqlRatingStore::new(url, *max_connections)?),
        RatingStoreType::Mongodb {
            url,
            database,
            max_connections,
        } => Arc::new(MongoRatingStore::new(url, database, *max_connections).await?),
    };

    tracing::info!(store = store.name(), "Rating store ready");
    Ok(store)
}
