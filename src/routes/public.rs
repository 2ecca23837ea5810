//! Public, key-protected variant of the verify endpoint.

use axum::extract::{Multipart, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use garde::Validate;
use tracing::warn;

use crate::app_state::AppState;
use crate::error::{ApiError, PublicApiError};
use crate::models::api::{PublicVerifyResponse, UploadConstraints};
use crate::routes::verify::read_upload_fields;
use crate::services::pipeline::VerificationRequest;

/// Rejects requests whose bearer token does not match the shared secret.
/// With no secret configured every request is rejected.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, PublicApiError> {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match (state.shared_secret.as_deref(), provided) {
        (Some(expected), Some(provided)) if provided == expected => Ok(next.run(request).await),
        (None, _) => {
            warn!("Rejecting public API request: no shared secret configured");
            Err(PublicApiError::Unauthorized)
        }
        _ => Err(PublicApiError::Unauthorized),
    }
}

/// POST /api/v1/verify
pub async fn verify_public(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PublicVerifyResponse>, PublicApiError> {
    let fields = read_upload_fields(&mut multipart)
        .await
        .map_err(ApiError::from)?;
    let file = fields.file.ok_or(PublicApiError::NoFile)?;

    let constraints = UploadConstraints {
        content_type: file.content_type.clone(),
        size: file.len(),
    };
    if let Err(report) = constraints.validate_with(&state.limits) {
        let message = report
            .iter()
            .next()
            .map(|(_, error)| error.message().to_string())
            .unwrap_or_else(|| report.to_string());
        return Err(PublicApiError::InvalidUpload(message));
    }

    let request = VerificationRequest::from_parts(Some(file), None).ok_or(PublicApiError::NoFile)?;
    let result = state
        .pipeline
        .verify(&request, Utc::now().date_naive())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PublicVerifyResponse::from_result(result, Utc::now())))
}
