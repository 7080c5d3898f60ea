use crate::endpoint::ServiceEndpoint;
use crate::headers::ForwardHeaders;
use crate::metrics_defs::{DOWNSTREAM_REQUEST_DURATION, DOWNSTREAM_REQUESTS};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Instant;
use tokio::time::timeout;

/// Result of a single downstream call. Transport problems are values, not errors:
/// the caller picks the fallback content.
#[derive(Clone, Debug, PartialEq)]
pub enum DownstreamOutcome {
    /// A response arrived. Non-2xx statuses land here too, body untouched.
    Success { status: StatusCode, body: Bytes },
    Timeout,
    TransportError(String),
}

impl DownstreamOutcome {
    /// Status returned by the downstream service, if one answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DownstreamOutcome::Success { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        !matches!(self, DownstreamOutcome::Success { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            DownstreamOutcome::Success { .. } => "success",
            DownstreamOutcome::Timeout => "timeout",
            DownstreamOutcome::TransportError(_) => "transport_error",
        }
    }
}

/// Issues bounded GET requests to downstream services.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct DownstreamClient {
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl Default for DownstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DownstreamClient {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    /// GET `{endpoint}/{path}` forwarding one value per header.
    ///
    /// The endpoint timeout covers connecting, sending, receiving the headers and
    /// collecting the complete body.
    pub async fn call(
        &self,
        endpoint: &ServiceEndpoint,
        headers: &ForwardHeaders,
        path: &str,
    ) -> DownstreamOutcome {
        let start = Instant::now();
        let outcome = self.exchange(endpoint, headers, path).await;

        let service = endpoint.name().to_string();
        let outcome_label = outcome.label();
        crate::counter!(DOWNSTREAM_REQUESTS, "service" => service.clone(), "outcome" => outcome_label)
            .increment(1);
        crate::histogram!(DOWNSTREAM_REQUEST_DURATION, "service" => service, "outcome" => outcome_label)
            .record(start.elapsed().as_secs_f64());

        match &outcome {
            DownstreamOutcome::Success { status, .. } => {
                tracing::debug!(service = endpoint.name(), path, status = %status, "Downstream call completed");
            }
            DownstreamOutcome::Timeout => {
                tracing::warn!(
                    service = endpoint.name(),
                    path,
                    timeout = ?endpoint.timeout(),
                    "Downstream call timed out"
                );
            }
            DownstreamOutcome::TransportError(e) => {
                tracing::warn!(service = endpoint.name(), path, error = %e, "Downstream call failed");
            }
        }

        outcome
    }

    async fn exchange(
        &self,
        endpoint: &ServiceEndpoint,
        headers: &ForwardHeaders,
        path: &str,
    ) -> DownstreamOutcome {
        let url = match endpoint.url_for(path) {
            Ok(url) => url,
            Err(e) => return DownstreamOutcome::TransportError(e.to_string()),
        };

        let mut builder = Request::builder().method(Method::GET).uri(url.as_str());
        for (name, value) in headers.first_values() {
            builder = builder.header(name, value.clone());
        }

        let request = match builder.body(Empty::<Bytes>::new()) {
            Ok(request) => request,
            Err(e) => {
                return DownstreamOutcome::TransportError(format!("failed to build request: {e}"));
            }
        };

        let client = self.client.clone();
        let exchange = async move {
            let response = client.request(request).await.map_err(|e| e.to_string())?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| e.to_string())?
                .to_bytes();
            Ok::<_, String>((status, body))
        };

        match timeout(endpoint.timeout(), exchange).await {
            Err(_) => DownstreamOutcome::Timeout,
            Ok(Err(e)) => DownstreamOutcome::TransportError(e),
            Ok(Ok((status, body))) => DownstreamOutcome::Success { status, body },
        }
    }
}
