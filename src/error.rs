//! HTTP error types for the two verify endpoints.
//!
//! The internal endpoint answers `{error, details?}`; the public endpoint
//! answers `{success: false, error, message, details?}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::pipeline::PipelineError;

/// Errors returned by `POST /api/verify`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file provided")]
    NoFile,

    #[error("Failed to read multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pipeline(PipelineError::ExtractionFailed(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NoFile => json!({ "error": self.to_string() }),
            ApiError::Multipart(e) => json!({
                "error": "Error processing the document",
                "details": e.body_text(),
            }),
            ApiError::Pipeline(e) => json!({
                "error": "Error processing the document",
                "details": e.to_string(),
            }),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Verification request failed");
        }
        (status, Json(body)).into_response()
    }
}

/// Errors returned by `POST /api/v1/verify`.
#[derive(Debug, thiserror::Error)]
pub enum PublicApiError {
    #[error("Invalid or missing API key. Please provide a valid API key in the Authorization header.")]
    Unauthorized,

    #[error("No file provided. Please include a file in the 'file' field of the multipart/form-data request.")]
    NoFile,

    /// Upload rejected by the type or size constraints.
    #[error("{0}")]
    InvalidUpload(String),

    #[error("The document could not be processed by the extraction service.")]
    Upstream(String),

    #[error("An error occurred while processing your request. Please try again later.")]
    Internal(String),
}

impl PublicApiError {
    fn status(&self) -> StatusCode {
        match self {
            PublicApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            PublicApiError::NoFile | PublicApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            PublicApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PublicApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            PublicApiError::Upstream(details) | PublicApiError::Internal(details) => {
                Some(details)
            }
            _ => None,
        }
    }
}

impl From<ApiError> for PublicApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::NoFile => PublicApiError::NoFile,
            ApiError::Multipart(e) => PublicApiError::Internal(e.body_text()),
            ApiError::Pipeline(e) => PublicApiError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for PublicApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "success": false,
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            body["details"] = json!(details);
        }

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                details = self.details().unwrap_or_default(),
                "Public verification request failed"
            );
        }
        (status, Json(body)).into_response()
    }
}
