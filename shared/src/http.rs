use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use tokio::net::TcpListener;

/// Binds `host:port` and serves `app` until Ctrl-C is received.
///
/// Failing to bind is the only error that ends the process at startup.
pub async fn serve(host: &str, port: u16, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"error": message}` with the given status.
pub fn make_error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: String,
}

/// Health payload for a service: 200 when healthy, 500 otherwise.
pub fn health_response(service: &str, healthy: bool) -> Response {
    if healthy {
        let body = HealthStatus {
            status: format!("{service} is healthy"),
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = HealthStatus {
            status: format!("{service} is not healthy"),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
