mod gemini;
mod unsplash;

pub use gemini::{GeminiApi, GeminiClient, ImagePayload};
pub use unsplash::{UnsplashApi, UnsplashClient};

use reqwest::StatusCode;
use thiserror::Error;

// Failures talking to a third-party API. Handlers log these with full detail
// server-side; clients only ever see a generic message.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not parse reply: {0}")]
    Parse(String),
}
