//! The reviews service: two canned reviews per product, optionally with star
//! ratings from the ratings service.

pub mod api;
pub mod config;
pub mod metrics_defs;
pub mod model;
pub mod ratings;

use crate::api::ReviewsState;
use crate::config::Config;
use crate::ratings::RatingsClient;
use shared::endpoint::EndpointError;

#[derive(thiserror::Error, Debug)]
pub enum ReviewsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ratings endpoint: {0}")]
    Endpoint(#[from] EndpointError),
}

pub async fn run(config: Config) -> Result<(), ReviewsError> {
    let ratings = if config.enable_ratings {
        let endpoint = config.ratings_endpoint()?;
        tracing::info!(
            ratings = %endpoint.base_url(),
            timeout = ?endpoint.timeout(),
            "Ratings enabled"
        );
        Some(RatingsClient::new(endpoint))
    } else {
        None
    };
    tracing::info!(port = config.port, star_color = %config.star_color, "Starting reviews service");

    let state = ReviewsState {
        ratings,
        star_color: config.star_color,
        pod_name: config.pod_name,
        cluster_name: config.cluster_name,
    };

    shared::http::serve(&config.host, config.port, api::router(state)).await?;
    Ok(())
}
