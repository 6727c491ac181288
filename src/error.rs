use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// Client-facing errors. The Display strings are exactly what goes over the
// wire, so upstream detail stays out of them; handlers log the real cause.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    #[error("Server configuration error")]
    Misconfigured,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn invalid(msg: &str) -> Self {
        ApiError::InvalidInput(msg.to_string())
    }

    pub fn upstream(msg: &str) -> Self {
        ApiError::Upstream(msg.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kind() {
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Misconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::invalid("Invalid query").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::upstream("Failed to analyze image. Please try again.").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn response_body_is_json_with_error_field() {
        let response = ApiError::invalid("Invalid image data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Invalid image data" }));
    }

    #[test]
    fn misconfigured_message_stays_generic() {
        assert_eq!(ApiError::Misconfigured.to_string(), "Server configuration error");
    }
}
