use crate::model::{RatingsLookup, RatingsResponse};
use shared::ProductId;
use shared::client::{DownstreamClient, DownstreamOutcome};
use shared::endpoint::ServiceEndpoint;
use shared::headers::ForwardHeaders;

/// Fetches reviewer scores from the ratings service.
#[derive(Clone)]
pub struct RatingsClient {
    client: DownstreamClient,
    endpoint: ServiceEndpoint,
}

impl RatingsClient {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            client: DownstreamClient::new(),
            endpoint,
        }
    }

    /// Any failure, including a non-200 answer or an unreadable body, is `Unavailable`.
    pub async fn lookup(&self, product_id: ProductId, headers: &ForwardHeaders) -> RatingsLookup {
        let outcome = self
            .client
            .call(&self.endpoint, headers, &product_id.to_string())
            .await;

        match outcome {
            DownstreamOutcome::Success { status, body } if status.is_success() => {
                match serde_json::from_slice::<RatingsResponse>(&body) {
                    Ok(response) => RatingsLookup::Found(response.ratings),
                    Err(e) => {
                        tracing::warn!(product_id, error = %e, "Unreadable ratings response");
                        RatingsLookup::Unavailable
                    }
                }
            }
            DownstreamOutcome::Success { status, .. } => {
                tracing::warn!(product_id, status = %status, "Ratings service returned an error");
                RatingsLookup::Unavailable
            }
            DownstreamOutcome::Timeout | DownstreamOutcome::TransportError(_) => {
                RatingsLookup::Unavailable
            }
        }
    }
}
