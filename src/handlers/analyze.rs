use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

use super::sanitize_text;
use crate::error::ApiError;
use crate::metrics::{ANALYZE_LATENCY, RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::rate_limit::client_key;
use crate::state::AppState;
use crate::upstream::ImagePayload;

// Encoded data-URL cap, roughly a 5 MB image; data-URLs are ASCII so byte
// length counts characters
const MAX_IMAGE_CHARS: usize = 7_000_000;
const MAX_PREFERENCES_CHARS: usize = 500;

// POST /api/analyze-image: rate limit, validate, forward to Gemini, return
// the parsed ingredient/recipe analysis. The payload stays a Result so the
// rate limiter runs even when the body is garbage.
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let key = client_key(&headers);
    if !state.analyze_limiter.check(&key) {
        RATE_LIMITED_TOTAL.inc();
        warn!("analyze-image rate limit hit for {}", key);
        return Err(ApiError::RateLimited);
    }

    let Some(gemini) = &state.gemini else {
        error!("GEMINI_API_KEY not configured");
        return Err(ApiError::Misconfigured);
    };

    let Json(request) = payload.map_err(|_| ApiError::invalid("Invalid image data"))?;

    if request.image_data.len() > MAX_IMAGE_CHARS {
        return Err(ApiError::invalid(
            "Image too large. Please use a smaller image.",
        ));
    }

    let image = parse_image_data(&request.image_data)
        .ok_or_else(|| ApiError::invalid("Invalid image data"))?;

    let preferences = sanitize_text(
        request.preferences.as_deref().unwrap_or(""),
        MAX_PREFERENCES_CHARS,
    );

    let start_time = Instant::now();
    let result = gemini.analyze_image(&image, &preferences).await;
    ANALYZE_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            error!("Gemini call failed: {}", e);
            Err(ApiError::upstream(
                "Failed to analyze image. Please try again.",
            ))
        }
    }
}

// Split a data:image/...;base64,... URL into mime type and payload
fn parse_image_data(data_url: &str) -> Option<ImagePayload> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime_type, data) = rest.split_once(";base64,")?;
    if !mime_type.starts_with("image/") || data.is_empty() {
        return None;
    }

    Some(ImagePayload {
        mime_type: mime_type.to_string(),
        data: data.to_string(),
    })
}
