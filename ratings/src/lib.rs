//! The ratings service: two reviewer scores per product, with optional
//! simulated outages.

pub mod api;
pub mod config;
pub mod fault;
pub mod metrics_defs;
pub mod overrides;
pub mod service;
pub mod store;

use crate::api::AppState;
use crate::config::Config;
use crate::fault::FaultSimulator;
use crate::service::RatingService;
use crate::store::{StoreError, get_store};
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum RatingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub async fn run(config: Config) -> Result<(), RatingsError> {
    let store_type = config.store_type();
    tracing::info!(
        port = config.port,
        version = ?config.service_version,
        store = ?store_type,
        "Starting ratings service"
    );

    let store = get_store(&store_type).await?;
    let state = AppState {
        simulator: Arc::new(FaultSimulator::start(config.fault_mode())),
        service: Arc::new(RatingService::new(store)),
    };

    shared::http::serve(&config.host, config.port, api::router(state)).await?;
    Ok(())
}
