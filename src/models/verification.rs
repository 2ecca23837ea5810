use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::models::payroll::ExtractedPayrollData;

/// Outcome of a single named check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckStatus {
    Success,
    Error,
    Warning,
}

/// Overall verdict for an uploaded document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Fraudulent,
}

/// One named validation outcome, in the order the checks ran.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    /// Stable machine-readable identifier, e.g. `national_id_check_digit`.
    pub code: String,
    pub label: String,
    pub status: CheckStatus,
    pub explanation: String,
}

impl CheckResult {
    pub fn success(code: &str, label: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(code, CheckStatus::Success, label, explanation)
    }

    pub fn error(code: &str, label: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(code, CheckStatus::Error, label, explanation)
    }

    pub fn warning(code: &str, label: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(code, CheckStatus::Warning, label, explanation)
    }

    fn new(
        code: &str,
        status: CheckStatus,
        label: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            code: code.to_string(),
            label: label.into(),
            status,
            explanation: explanation.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == CheckStatus::Error
    }
}

/// Probability breakdown reported by the AI-image detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AiBreakdown {
    pub ai_probability: f64,
    pub fake_probability: f64,
    pub nsfw_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_probabilities: Option<BTreeMap<String, f64>>,
}

/// Result of verifying one uploaded payslip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub request_id: Uuid,
    pub status: VerificationStatus,

    /// Primary reason for a non-valid verdict (the first failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Every failure reason, in check order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,

    pub checks: Vec<CheckResult>,
    pub document_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_generated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_breakdown: Option<AiBreakdown>,

    pub extracted_data: ExtractedPayrollData,

    // Degraded-mode notices (collaborator fallbacks, demo fixture in use)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl VerificationResult {
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|check| check.is_failure())
    }
}
