use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use tracing::debug;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::document::UploadedDocument;
use crate::models::verification::VerificationResult;
use crate::services::pipeline::VerificationRequest;

/// Files found in a verification upload.
#[derive(Debug, Default)]
pub struct UploadFields {
    pub file: Option<UploadedDocument>,
    pub original_file: Option<UploadedDocument>,
}

/// Read the `file` and `originalFile` parts. Other parts are ignored, and an
/// empty part counts as absent.
pub async fn read_upload_fields(multipart: &mut Multipart) -> Result<UploadFields, MultipartError> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        if data.is_empty() {
            continue;
        }

        let document = UploadedDocument::new(file_name, content_type, data.to_vec());
        match name.as_deref() {
            Some("file") => fields.file = Some(document),
            Some("originalFile") => fields.original_file = Some(document),
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(fields)
}

/// POST /api/verify: verify an uploaded payslip.
pub async fn verify_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VerificationResult>, ApiError> {
    let fields = read_upload_fields(&mut multipart).await?;
    let request = VerificationRequest::from_parts(fields.file, fields.original_file)
        .ok_or(ApiError::NoFile)?;

    let result = state
        .pipeline
        .verify(&request, Utc::now().date_naive())
        .await?;

    Ok(Json(result))
}
