use crate::aggregator::Aggregator;
use crate::model::{
    CompositeResult, DETAILS_UNAVAILABLE, Product, RATINGS_UNAVAILABLE, REVIEWS_UNAVAILABLE,
    products,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use shared::ProductId;
use shared::client::DownstreamOutcome;
use shared::headers::inbound_headers;
use shared::http::{health_response, make_error_response};
use std::sync::Arc;

/// The only product the page renders.
const DEFAULT_PRODUCT_ID: ProductId = 0;

#[derive(thiserror::Error, Debug)]
pub enum ProductPageApiError {
    #[error("please provide numeric product ID")]
    InvalidProductId,
}

impl IntoResponse for ProductPageApiError {
    fn into_response(self) -> Response {
        make_error_response(StatusCode::BAD_REQUEST, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
struct PageParams {
    user: Option<String>,
}

pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/productpage", get(product_page))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/{product_id}", get(product_details))
        .route("/api/v1/products/{product_id}/reviews", get(product_reviews))
        .route("/api/v1/products/{product_id}/ratings", get(product_ratings))
        .with_state(Arc::new(aggregator))
}

async fn health() -> Response {
    health_response("Product page", true)
}

async fn product_page(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<PageParams>,
    headers: HeaderMap,
) -> Json<CompositeResult> {
    let user = params.user.as_deref().filter(|user| !user.is_empty());
    let result = aggregator
        .compose_product(DEFAULT_PRODUCT_ID, &inbound_headers(&headers), user)
        .await;
    Json(result)
}

async fn list_products() -> Json<Vec<Product>> {
    Json(products())
}

fn parse_product_id(raw: &str) -> Result<ProductId, ProductPageApiError> {
    raw.parse().map_err(|_| ProductPageApiError::InvalidProductId)
}

async fn product_details(
    State(aggregator): State<Arc<Aggregator>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProductPageApiError> {
    let product_id = parse_product_id(&product_id)?;
    let headers = Aggregator::outgoing_headers(&inbound_headers(&headers), None);
    let outcome = aggregator.fetch_details(product_id, &headers).await;
    Ok(relay(outcome, DETAILS_UNAVAILABLE))
}

async fn product_reviews(
    State(aggregator): State<Arc<Aggregator>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProductPageApiError> {
    let product_id = parse_product_id(&product_id)?;
    let headers = Aggregator::outgoing_headers(&inbound_headers(&headers), None);
    let outcome = aggregator.fetch_reviews(product_id, &headers).await;
    Ok(relay(outcome, REVIEWS_UNAVAILABLE))
}

async fn product_ratings(
    State(aggregator): State<Arc<Aggregator>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProductPageApiError> {
    let product_id = parse_product_id(&product_id)?;
    let headers = Aggregator::outgoing_headers(&inbound_headers(&headers), None);
    let outcome = aggregator.fetch_ratings(product_id, &headers).await;
    Ok(relay(outcome, RATINGS_UNAVAILABLE))
}

/// Passes a downstream answer through untouched, or a 500 when none arrived.
fn relay(outcome: DownstreamOutcome, unavailable: &str) -> Response {
    match outcome {
        DownstreamOutcome::Success { status, body } => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        DownstreamOutcome::Timeout | DownstreamOutcome::TransportError(_) => {
            make_error_response(StatusCode::INTERNAL_SERVER_ERROR, unavailable)
        }
    }
}
