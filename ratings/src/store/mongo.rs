use super::{ProductRatings, RatingStore, StoreError, first_two};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::Deserialize;
use shared::ProductId;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize, Debug)]
struct RatingDocument {
    rating: i32,
}

/// Reads rating documents from the `ratings` collection.
pub struct MongoRatingStore {
    database: Database,
    ratings: Collection<RatingDocument>,
}

impl MongoRatingStore {
    /// Parses the URL and sets up the driver's pool. Servers are contacted lazily.
    pub async fn new(url: &str, database: &str, max_connections: usize) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(CONNECT_TIMEOUT);
        options.max_pool_size = Some(u32::try_from(max_connections).unwrap_or(u32::MAX));

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let database = client.database(database);
        let ratings = database.collection::<RatingDocument>("ratings");

        Ok(Self { database, ratings })
    }
}

#[async_trait]
impl RatingStore for MongoRatingStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn fetch_two_ratings(
        &self,
        _product_id: ProductId,
    ) -> Result<ProductRatings, StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let documents: Vec<RatingDocument> = self
            .ratings
            .find(doc! {})
            .limit(2)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        first_two(documents.into_iter().map(|d| d.rating).collect())
    }
}
