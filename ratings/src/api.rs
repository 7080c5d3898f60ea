use crate::fault::{Admission, FaultSimulator};
use crate::service::{RatingService, RatingsRecord};
use crate::store::{MAX_SCORE, ProductRatings, StoreError};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use shared::ProductId;
use shared::http::{health_response, make_error_response};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<FaultSimulator>,
    pub service: Arc<RatingService>,
}

#[derive(thiserror::Error, Debug)]
pub enum RatingsApiError {
    #[error("please provide numeric product ID")]
    InvalidProductId,
    #[error("Service unavailable")]
    Unavailable,
    #[error("invalid ratings: {0}")]
    InvalidRatings(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for RatingsApiError {
    fn into_response(self) -> Response {
        let status = match self {
            RatingsApiError::InvalidProductId | RatingsApiError::InvalidRatings(_) => {
                StatusCode::BAD_REQUEST
            }
            RatingsApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            RatingsApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        make_error_response(status, self.to_string())
    }
}

/// Body of a rating submission. Scores are range checked after parsing.
#[derive(Deserialize, Debug)]
struct RatingsSubmission {
    #[serde(rename = "Reviewer1")]
    reviewer1: i64,
    #[serde(rename = "Reviewer2")]
    reviewer2: i64,
}

impl TryFrom<RatingsSubmission> for ProductRatings {
    type Error = RatingsApiError;

    fn try_from(submission: RatingsSubmission) -> Result<Self, Self::Error> {
        let score = |name: &str, value: i64| {
            if (0..=i64::from(MAX_SCORE)).contains(&value) {
                i32::try_from(value).map_err(|e| RatingsApiError::InvalidRatings(e.to_string()))
            } else {
                Err(RatingsApiError::InvalidRatings(format!(
                    "{name} must be between 0 and {MAX_SCORE}, got {value}"
                )))
            }
        };

        Ok(ProductRatings {
            reviewer1: score("Reviewer1", submission.reviewer1)?,
            reviewer2: score("Reviewer2", submission.reviewer2)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ratings/{product_id}", get(get_ratings).post(post_ratings))
        .with_state(state)
}

fn parse_product_id(raw: &str) -> Result<ProductId, RatingsApiError> {
    raw.parse().map_err(|_| RatingsApiError::InvalidProductId)
}

async fn health(State(state): State<AppState>) -> Response {
    health_response("Ratings", state.simulator.health().is_healthy())
}

async fn get_ratings(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<RatingsRecord>, RatingsApiError> {
    let product_id = parse_product_id(&product_id)?;

    match state.simulator.admit() {
        Admission::Serve => {}
        Admission::Reject => return Err(RatingsApiError::Unavailable),
        Admission::Delay(delay) => tokio::time::sleep(delay).await,
    }

    let record = state.service.fetch(product_id).await?;
    Ok(Json(record))
}

async fn post_ratings(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    body: Bytes,
) -> Result<Json<RatingsRecord>, RatingsApiError> {
    let product_id = parse_product_id(&product_id)?;

    let submission: RatingsSubmission = serde_json::from_slice(&body)
        .map_err(|e| RatingsApiError::InvalidRatings(e.to_string()))?;
    let ratings = ProductRatings::try_from(submission)?;

    Ok(Json(state.service.submit(product_id, ratings)))
}
