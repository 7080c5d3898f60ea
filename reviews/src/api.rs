use crate::metrics_defs::REVIEWS_SERVED;
use crate::model::{RatingsLookup, ReviewSet};
use crate::ratings::RatingsClient;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use shared::ProductId;
use shared::headers::forward_headers;
use shared::http::{health_response, make_error_response};
use std::sync::Arc;

pub struct ReviewsState {
    /// `None` when ratings are disabled.
    pub ratings: Option<RatingsClient>,
    pub star_color: String,
    pub pod_name: String,
    pub cluster_name: String,
}

pub fn router(state: ReviewsState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reviews/{product_id}", get(get_reviews))
        .with_state(Arc::new(state))
}

async fn health() -> Response {
    health_response("Reviews", true)
}

async fn get_reviews(
    State(state): State<Arc<ReviewsState>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Ok(product_id) = product_id.parse::<ProductId>() else {
        return make_error_response(StatusCode::BAD_REQUEST, "please provide numeric product ID");
    };

    let lookup = match &state.ratings {
        Some(client) => client.lookup(product_id, &forward_headers(&headers)).await,
        None => RatingsLookup::Disabled,
    };

    let label = match lookup {
        RatingsLookup::Disabled => "disabled",
        RatingsLookup::Found(_) => "ok",
        RatingsLookup::Unavailable => "unavailable",
    };
    shared::counter!(REVIEWS_SERVED, "ratings" => label).increment(1);

    let reviews = ReviewSet::build(
        product_id,
        &state.pod_name,
        &state.cluster_name,
        &lookup,
        &state.star_color,
    );
    Json(reviews).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{REVIEW_TEXTS, RATINGS_UNAVAILABLE};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use shared::endpoint::ServiceEndpoint;
    use shared::testutils::{closed_port, spawn_router};
    use std::time::Duration;
    use tower::ServiceExt;

    fn state(ratings: Option<RatingsClient>, star_color: &str) -> ReviewsState {
        ReviewsState {
            ratings,
            star_color: star_color.into(),
            pod_name: "reviews-v2".into(),
            cluster_name: "east".into(),
        }
    }

    fn ratings_client(port: u16) -> RatingsClient {
        RatingsClient::new(
            ServiceEndpoint::new(
                "ratings",
                "127.0.0.1",
                "",
                port,
                "ratings",
                Duration::from_secs(3),
            )
            .unwrap(),
        )
    }

    async fn get(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_reviews_without_ratings() {
        let (status, body) = get(router(state(None, "black")), request("/reviews/0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 0);
        assert_eq!(body["podname"], "reviews-v2");
        assert_eq!(body["clustername"], "east");

        let reviewers = body["reviewers"].as_array().unwrap();
        assert_eq!(reviewers.len(), 2);
        for (reviewer, (name, text)) in reviewers.iter().zip(REVIEW_TEXTS) {
            assert_eq!(reviewer["reviewer"], name);
            assert_eq!(reviewer["text"], text);
            assert!(reviewer.get("rating").is_none());
        }
    }

    #[tokio::test]
    async fn test_reviews_with_ratings() {
        // Stub ratings service that also checks header propagation
        let ratings = Router::new().route(
            "/ratings/{id}",
            axum::routing::get(|Path(id): Path<i64>, headers: HeaderMap| async move {
                let end_user = headers
                    .get("end-user")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                assert_eq!(end_user, "jason");
                assert!(headers.get("x-internal").is_none());
                Json(serde_json::json!({"id": id, "ratings": {"Reviewer1": 5, "Reviewer2": 4}}))
            }),
        );
        let addr = spawn_router(ratings).await;

        let app = router(state(Some(ratings_client(addr.port())), "red"));
        let request = Request::builder()
            .uri("/reviews/0")
            .header("end-user", "jason")
            .header("x-internal", "secret")
            .body(Body::empty())
            .unwrap();
        let (status, body) = get(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["reviewers"][0]["rating"],
            serde_json::json!({"stars": 5, "color": "red"})
        );
        assert_eq!(
            body["reviewers"][1]["rating"],
            serde_json::json!({"stars": 4, "color": "red"})
        );
    }

    #[tokio::test]
    async fn test_ratings_down_marks_each_review() {
        let port = closed_port().await;
        let app = router(state(Some(ratings_client(port)), "black"));

        let (status, body) = get(app, request("/reviews/3")).await;
        assert_eq!(status, StatusCode::OK);
        for reviewer in body["reviewers"].as_array().unwrap() {
            assert_eq!(reviewer["rating"]["error"], RATINGS_UNAVAILABLE);
            assert!(reviewer["rating"].get("stars").is_none());
        }
    }

    #[tokio::test]
    async fn test_ratings_error_status_marks_each_review() {
        let ratings = Router::new().route(
            "/ratings/{id}",
            axum::routing::get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({"error": "Service unavailable"})),
                )
            }),
        );
        let addr = spawn_router(ratings).await;
        let app = router(state(Some(ratings_client(addr.port())), "black"));

        let (_, body) = get(app, request("/reviews/0")).await;
        assert_eq!(body["reviewers"][0]["rating"]["error"], RATINGS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_non_numeric_id() {
        let (status, body) = get(router(state(None, "black")), request("/reviews/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "please provide numeric product ID");

        let (status, body) = get(router(state(None, "black")), request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Reviews is healthy");
    }
}
