use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

use super::sanitize_text;
use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL, SEARCH_DEGRADED_TOTAL, SEARCH_LATENCY};
use crate::models::{ImageResult, SearchRequest};
use crate::rate_limit::client_key;
use crate::state::AppState;

const MAX_QUERY_CHARS: usize = 100;

// POST /api/search-image: look up one stock photo for a recipe name. The
// photo is decoration for a recipe card, so once the input is validated every
// failure degrades to a 200 with a null body instead of an error status.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Option<ImageResult>>, ApiError> {
    REQUEST_TOTAL.inc();

    let key = client_key(&headers);
    if !state.search_limiter.check(&key) {
        RATE_LIMITED_TOTAL.inc();
        warn!("search-image rate limit hit for {}", key);
        return Err(ApiError::RateLimited);
    }

    let Some(unsplash) = &state.unsplash else {
        error!("UNSPLASH_ACCESS_KEY not configured");
        return Err(ApiError::Misconfigured);
    };

    let Json(request) = payload.map_err(|_| ApiError::invalid("Invalid query"))?;

    let query = sanitize_text(&request.query, MAX_QUERY_CHARS);
    if query.is_empty() {
        return Err(ApiError::invalid("Invalid query"));
    }

    let start_time = Instant::now();
    let result = unsplash.search_photos(&query).await;
    SEARCH_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(hit) => Ok(Json(hit)),
        Err(e) => {
            SEARCH_DEGRADED_TOTAL.inc();
            warn!("Unsplash search failed, degrading to null: {}", e);
            Ok(Json(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use crate::handlers::testing::{
        MockUnsplash, post_json, sample_hit, state_with, state_with_limit,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn returns_first_hit_with_attribution() {
        let mock = Arc::new(MockUnsplash::returning(Some(sample_hit())));
        let app = build_router(state_with(None, Some(mock.clone())));

        let (status, body) = post_json(app, "/api/search-image", json!({ "query": "omelette" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "abc123");
        assert_eq!(body["url"], "https://images.unsplash.com/photo-abc123");
        assert_eq!(body["photographer"], "Jane Doe");
        assert_eq!(body["photographerUrl"], "https://unsplash.com/@janedoe");
        assert_eq!(
            body["downloadLocation"],
            "https://api.unsplash.com/photos/abc123/download"
        );
        assert_eq!(mock.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_results_yield_null_body() {
        let mock = Arc::new(MockUnsplash::returning(None));
        let app = build_router(state_with(None, Some(mock.clone())));

        let (status, body) = post_json(app, "/api/search-image", json!({ "query": "omelette" })).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_null() {
        let mock = Arc::new(MockUnsplash::failing());
        let app = build_router(state_with(None, Some(mock.clone())));

        let (status, body) = post_json(app, "/api/search-image", json!({ "query": "omelette" })).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
        assert_eq!(mock.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_credential_is_a_generic_500() {
        let app = build_router(state_with(None, None));

        let (status, body) = post_json(app, "/api/search-image", json!({ "query": "omelette" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server configuration error");
        assert!(!body["error"].as_str().unwrap().contains("UNSPLASH"));
    }

    #[tokio::test]
    async fn blank_or_malformed_queries_are_rejected() {
        let mock = Arc::new(MockUnsplash::returning(Some(sample_hit())));
        let app = build_router(state_with(None, Some(mock.clone())));

        let bad_payloads = [
            json!({ "query": "   " }),
            json!({ "query": 42 }),
            json!({}),
            json!({ "query": "omelette", "page": 2 }),
        ];

        for payload in bad_payloads {
            let (status, body) = post_json(app.clone(), "/api/search-image", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid query");
        }
        assert_eq!(mock.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn query_is_truncated_to_the_cap() {
        let mock = Arc::new(MockUnsplash::returning(Some(sample_hit())));
        let app = build_router(state_with(None, Some(mock.clone())));

        let long = "q".repeat(MAX_QUERY_CHARS + 50);
        let (status, _) = post_json(app, "/api/search-image", json!({ "query": long })).await;

        assert_eq!(status, StatusCode::OK);
        let recorded = mock.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(recorded.chars().count(), MAX_QUERY_CHARS);
    }

    #[tokio::test]
    async fn requests_over_the_limit_get_429() {
        let mock = Arc::new(MockUnsplash::returning(Some(sample_hit())));
        let app = build_router(state_with_limit(None, Some(mock.clone()), 1));

        let (first, _) =
            post_json(app.clone(), "/api/search-image", json!({ "query": "omelette" })).await;
        assert_eq!(first, StatusCode::OK);

        let (second, body) =
            post_json(app, "/api/search-image", json!({ "query": "omelette" })).await;
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body["error"],
            "Too many requests. Please wait a moment and try again."
        );
        assert_eq!(mock.search_calls.load(Ordering::SeqCst), 1);
    }
}
