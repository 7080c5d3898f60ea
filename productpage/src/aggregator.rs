//! Aggregator: one composite product view from the details and reviews services.
//!
//! Downstream failures never escape as errors. Each section of the result is
//! either the parsed record or an error marker, alongside the status to report.

use crate::config::Endpoints;
use crate::flood::Flooder;
use crate::metrics_defs::{COMPOSITE_RENDERS, REVIEWS_RETRIES};
use crate::model::{
    BookDetails, CompositeResult, DETAILS_UNAVAILABLE, ProductReviews, REVIEWS_UNAVAILABLE,
    Section, get_product,
};
use axum::http::{HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use shared::ProductId;
use shared::client::{DownstreamClient, DownstreamOutcome};
use shared::headers::{END_USER, FORWARD_HEADERS, ForwardHeaders, InboundHeaders, filter};

pub struct Aggregator {
    client: DownstreamClient,
    endpoints: Endpoints,
    flooder: Option<Flooder>,
    reviews_retry: bool,
}

impl Aggregator {
    pub fn new(
        client: DownstreamClient,
        endpoints: Endpoints,
        flooder: Option<Flooder>,
        reviews_retry: bool,
    ) -> Self {
        Aggregator {
            client,
            endpoints,
            flooder,
            reviews_retry,
        }
    }

    /// Allow-listed inbound headers plus `end-user` when a user is known.
    ///
    /// A user name that cannot be a header value is not forwarded.
    pub fn outgoing_headers(inbound: &InboundHeaders, user: Option<&str>) -> ForwardHeaders {
        let mut headers = filter(inbound, FORWARD_HEADERS);
        if let Some(user) = user {
            match HeaderValue::from_str(user) {
                Ok(value) => headers.insert(END_USER, value),
                Err(e) => tracing::warn!(error = %e, "Dropping invalid end-user header"),
            }
        }
        headers
    }

    pub async fn compose_product(
        &self,
        product_id: ProductId,
        inbound: &InboundHeaders,
        user: Option<&str>,
    ) -> CompositeResult {
        let headers = Self::outgoing_headers(inbound, user);

        if let Some(flooder) = &self.flooder
            && flooder.factor() > 0
        {
            flooder.flood(product_id, headers.clone());
        }

        let (details, reviews) = tokio::join!(
            self.fetch_details(product_id, &headers),
            self.fetch_reviews(product_id, &headers),
        );
        let (details_status, details) =
            into_section::<BookDetails>(details, DETAILS_UNAVAILABLE);
        let (reviews_status, reviews) =
            into_section::<ProductReviews>(reviews, REVIEWS_UNAVAILABLE);

        shared::counter!(
            COMPOSITE_RENDERS,
            "details" => section_label(&details),
            "reviews" => section_label(&reviews)
        )
        .increment(1);

        CompositeResult {
            details_status: details_status.as_u16(),
            reviews_status: reviews_status.as_u16(),
            product: get_product(product_id),
            details,
            reviews,
            user: user.map(str::to_string),
        }
    }

    pub async fn fetch_details(
        &self,
        product_id: ProductId,
        headers: &ForwardHeaders,
    ) -> DownstreamOutcome {
        self.client
            .call(&self.endpoints.details, headers, &product_id.to_string())
            .await
    }

    /// Reviews call with at most one retry after a transport failure, when enabled.
    pub async fn fetch_reviews(
        &self,
        product_id: ProductId,
        headers: &ForwardHeaders,
    ) -> DownstreamOutcome {
        let path = product_id.to_string();
        let attempts = if self.reviews_retry { 2 } else { 1 };

        let mut outcome = self.client.call(&self.endpoints.reviews, headers, &path).await;
        for _ in 1..attempts {
            if !outcome.is_transport_failure() {
                break;
            }
            shared::counter!(REVIEWS_RETRIES).increment(1);
            tracing::info!(product_id, "Retrying reviews call");
            outcome = self.client.call(&self.endpoints.reviews, headers, &path).await;
        }
        outcome
    }

    pub async fn fetch_ratings(
        &self,
        product_id: ProductId,
        headers: &ForwardHeaders,
    ) -> DownstreamOutcome {
        self.client
            .call(&self.endpoints.ratings, headers, &product_id.to_string())
            .await
    }
}

/// Status to report and section content for one downstream outcome.
fn into_section<T: DeserializeOwned>(
    outcome: DownstreamOutcome,
    unavailable: &str,
) -> (StatusCode, Section<T>) {
    match outcome {
        DownstreamOutcome::Success { status, body } if status.is_success() => {
            match serde_json::from_slice::<Section<T>>(&body) {
                Ok(section) => (status, section),
                Err(e) => {
                    tracing::warn!(error = %e, "Unparsable downstream response");
                    (status, Section::error(unavailable))
                }
            }
        }
        DownstreamOutcome::Success { status, .. } => (status, Section::error(unavailable)),
        DownstreamOutcome::Timeout | DownstreamOutcome::TransportError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Section::error(unavailable))
        }
    }
}

fn section_label<T>(section: &Section<T>) -> &'static str {
    if section.is_available() { "ok" } else { "error" }
}
