//! The product page: composes details and reviews into one view, with optional
//! synthetic load against the reviews service.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod flood;
pub mod metrics_defs;
pub mod model;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::flood::Flooder;
use shared::client::DownstreamClient;
use shared::endpoint::EndpointError;

#[derive(thiserror::Error, Debug)]
pub enum ProductPageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid downstream endpoint: {0}")]
    Endpoint(#[from] EndpointError),
}

pub async fn run(config: Config) -> Result<(), ProductPageError> {
    let endpoints = config.endpoints()?;
    let client = DownstreamClient::new();

    let flooder = (config.flood_factor > 0).then(|| {
        Flooder::new(
            client.clone(),
            endpoints.reviews.clone(),
            config.flood_factor,
            config.flood_concurrency,
        )
    });

    tracing::info!(
        port = config.port,
        details = %endpoints.details.base_url(),
        reviews = %endpoints.reviews.base_url(),
        ratings = %endpoints.ratings.base_url(),
        flood_factor = config.flood_factor,
        reviews_retry = config.reviews_retry,
        "Starting product page"
    );

    let aggregator = Aggregator::new(client, endpoints, flooder, config.reviews_retry);
    shared::http::serve(&config.host, config.port, api::router(aggregator)).await?;
    Ok(())
}
