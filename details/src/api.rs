use crate::book::BookInfo;
use crate::metrics_defs::DETAILS_LOOKUPS;
use crate::volumes::load_volumes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use shared::ProductId;
use shared::http::{health_response, make_error_response};
use std::path::PathBuf;
use std::sync::Arc;

/// Where book records come from, fixed at startup.
#[derive(Clone, Debug)]
pub enum BookSource {
    Builtin,
    Volumes(PathBuf),
}

impl BookSource {
    fn name(&self) -> &'static str {
        match self {
            BookSource::Builtin => "builtin",
            BookSource::Volumes(_) => "volumes",
        }
    }
}

pub fn router(source: BookSource) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/details/{product_id}", get(get_details))
        .with_state(Arc::new(source))
}

async fn health() -> Response {
    health_response("Details", true)
}

async fn get_details(
    State(source): State<Arc<BookSource>>,
    Path(product_id): Path<String>,
) -> Response {
    let Ok(product_id) = product_id.parse::<ProductId>() else {
        return make_error_response(StatusCode::BAD_REQUEST, "please provide numeric product ID");
    };

    let result = match source.as_ref() {
        BookSource::Builtin => Ok(BookInfo::builtin(product_id)),
        BookSource::Volumes(path) => load_volumes(product_id, path).await,
    };

    match result {
        Ok(book) => {
            shared::counter!(DETAILS_LOOKUPS, "source" => source.name(), "outcome" => "success")
                .increment(1);
            Json(book).into_response()
        }
        Err(e) => {
            // Source failures are reported in the body, the status stays 200
            shared::counter!(DETAILS_LOOKUPS, "source" => source.name(), "outcome" => "error")
                .increment(1);
            tracing::warn!(product_id, error = %e, "Failed to load book details");
            make_error_response(StatusCode::OK, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volumes::tests::COMEDY_OF_ERRORS;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::io::Write;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_builtin_details() {
        let (status, body) = get(router(BookSource::Builtin), "/details/0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 0);
        assert_eq!(body["author"], "William Shakespeare");
        assert_eq!(body["ISBN-13"], "123-1234567890");
    }

    #[tokio::test]
    async fn test_non_numeric_id() {
        let (status, body) = get(router(BookSource::Builtin), "/details/zero").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "please provide numeric product ID");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(router(BookSource::Builtin), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Details is healthy");
    }

    #[tokio::test]
    async fn test_volumes_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COMEDY_OF_ERRORS.as_bytes()).unwrap();

        let app = router(BookSource::Volumes(file.path().to_path_buf()));
        let (status, body) = get(app, "/details/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);
        assert_eq!(body["year"], "2002");
        assert_eq!(body["ISBN-10"], "0486424618");
    }

    #[tokio::test]
    async fn test_volumes_failure_is_reported_in_body() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(BookSource::Volumes(dir.path().join("missing.json")));

        let (status, body) = get(app, "/details/0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("failed to read volumes file")
        );
        assert!(body.get("author").is_none());
    }
}
