use super::{ProductRatings, RatingStore, StoreError, first_two};
use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::sql_types::Integer;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};
use shared::ProductId;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(QueryableByName)]
struct RatingRow {
    #[diesel(sql_type = Integer)]
    rating: i32,
}

/// Reads ratings rows from MySQL through a bounded connection pool.
pub struct MysqlRatingStore {
    pool: Pool<AsyncMysqlConnection>,
}

impl MysqlRatingStore {
    /// Builds the pool. No connection is opened until the first fetch.
    pub fn new(url: &str, max_connections: usize) -> Result<Self, StoreError> {
        let manager = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(url);

        let pool = Pool::builder(manager)
            .max_size(max_connections)
            .wait_timeout(Some(CONNECT_TIMEOUT))
            .create_timeout(Some(CONNECT_TIMEOUT))
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RatingStore for MysqlRatingStore {
    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn fetch_two_ratings(
        &self,
        _product_id: ProductId,
    ) -> Result<ProductRatings, StoreError> {
        // The connection goes back to the pool when `conn` is dropped
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let rows: Vec<RatingRow> = diesel::sql_query("SELECT Rating AS rating FROM ratings LIMIT 2")
            .load(&mut conn)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        first_two(rows.into_iter().map(|row| row.rating).collect())
    }
}
