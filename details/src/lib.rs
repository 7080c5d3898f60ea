//! The details service: static book metadata per product.

pub mod api;
pub mod book;
pub mod config;
pub mod metrics_defs;
pub mod volumes;

use crate::api::BookSource;
use crate::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum DetailsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run(config: Config) -> Result<(), DetailsError> {
    let source = if config.enable_external_book_service {
        BookSource::Volumes(config.book_volumes_file.clone())
    } else {
        BookSource::Builtin
    };
    tracing::info!(port = config.port, source = ?source, "Starting details service");

    shared::http::serve(&config.host, config.port, api::router(source)).await?;
    Ok(())
}
