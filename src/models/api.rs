use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::payroll::ExtractedPayrollData;
use crate::models::verification::{CheckStatus, VerificationResult, VerificationStatus};

/// Content types accepted by the public API.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["application/pdf", "image/png", "image/jpeg", "image/jpg"];

/// Confidence reported when the detector gave no breakdown.
const AI_CONFIDENCE_DETECTED: f64 = 0.8;
const AI_CONFIDENCE_CLEAN: f64 = 0.05;

/// Limits applied to public API uploads.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

/// Upload metadata checked before any collaborator is called.
#[derive(Debug, Validate)]
#[garde(context(UploadLimits))]
pub struct UploadConstraints {
    #[garde(custom(allowed_content_type))]
    pub content_type: String,

    #[garde(custom(within_size_limit))]
    pub size: usize,
}

fn allowed_content_type(value: &str, _limits: &UploadLimits) -> garde::Result {
    if ALLOWED_CONTENT_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "Invalid file type: {value}. Allowed types: PDF, PNG, JPG, JPEG"
        )))
    }
}

fn within_size_limit(value: &usize, limits: &UploadLimits) -> garde::Result {
    if *value <= limits.max_bytes {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "File too large: {:.2}MB. Maximum size: {}MB",
            *value as f64 / 1024.0 / 1024.0,
            limits.max_bytes / 1024 / 1024
        )))
    }
}

/// One check in the public response schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicValidation {
    pub check: String,
    pub status: CheckStatus,
    pub message: String,
    pub details: String,
}

/// Stable external schema returned by `POST /api/v1/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVerifyResponse {
    pub success: bool,
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    pub ai_generated: bool,
    pub ai_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<ExtractedPayrollData>,
    pub validations: Vec<PublicValidation>,
    pub timestamp: DateTime<Utc>,
}

impl PublicVerifyResponse {
    pub fn from_result(result: VerificationResult, timestamp: DateTime<Utc>) -> Self {
        let ai_generated = result.ai_generated.unwrap_or(false);
        let ai_confidence = match &result.ai_breakdown {
            Some(breakdown) => breakdown.ai_probability,
            None if ai_generated => AI_CONFIDENCE_DETECTED,
            None => AI_CONFIDENCE_CLEAN,
        };

        let validations = result
            .checks
            .into_iter()
            .map(|check| PublicValidation {
                check: check.label.clone(),
                status: check.status,
                message: check.label,
                details: check.explanation,
            })
            .collect();

        Self {
            success: result.status == VerificationStatus::Valid,
            status: result.status,
            message: result.reason,
            document_type: Some(result.document_type),
            ai_generated,
            ai_confidence,
            extracted_data: Some(result.extracted_data),
            validations,
            timestamp,
        }
    }
}
