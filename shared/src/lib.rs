pub mod client;
pub mod endpoint;
pub mod headers;
pub mod http;
pub mod metrics_defs;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Product identifiers are plain integers across all services.
pub type ProductId = i64;
