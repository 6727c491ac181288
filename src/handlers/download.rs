use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use tracing::{error, warn};
use url::Url;

use crate::error::ApiError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::{DownloadRequest, DownloadResponse};
use crate::state::AppState;

// POST /api/trigger-download: Unsplash requires a download-tracking call
// whenever a fetched photo is actually shown to a user. The acknowledgment
// goes out immediately and the provider call runs detached; a lost
// notification never becomes the user's problem.
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let Some(unsplash) = &state.unsplash else {
        error!("UNSPLASH_ACCESS_KEY not configured");
        return Err(ApiError::Misconfigured);
    };

    let Json(request) = payload.map_err(|_| ApiError::invalid("Invalid download location"))?;

    if !is_unsplash_download_url(&request.download_location) {
        return Err(ApiError::invalid("Invalid Unsplash URL"));
    }

    let client = Arc::clone(unsplash);
    tokio::spawn(async move {
        if let Err(e) = client.trigger_download(&request.download_location).await {
            warn!("Unsplash download trigger failed: {}", e);
        }
    });

    Ok(Json(DownloadResponse { success: true }))
}

// The credential only ever goes to the host we got the location from; URLs
// that merely mention it somewhere do not count
fn is_unsplash_download_url(location: &str) -> bool {
    match Url::parse(location) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str() == Some("api.unsplash.com")
        }
        Err(_) => false,
    }
}
