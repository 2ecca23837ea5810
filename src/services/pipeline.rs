use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ExtractionFallback;
use crate::models::document::UploadedDocument;
use crate::models::payroll::ExtractedPayrollData;
use crate::models::verification::{AiBreakdown, CheckResult, VerificationResult, VerificationStatus};
use crate::services::collaborator::{
    AiDetection, AiImageDetector, Classification, CollaboratorError, CollaboratorOutcome,
    DocumentClassifier, DocumentExtractor,
};
use crate::services::fixtures::demo_payroll_record;
use crate::services::rendering::{self, DetectionInput};
use crate::services::validation;

/// Confidence assumed for the classifier when it is not configured.
const DEMO_CLASSIFICATION_CONFIDENCE: f64 = 0.95;

/// Confidence reported when classification failed.
const FAILED_CLASSIFICATION_CONFIDENCE: f64 = 0.5;

pub mod codes {
    pub const DOCUMENT_TYPE: &str = "document_type";
    pub const DOCUMENT_TYPE_MISMATCH: &str = "document_type_mismatch";
    pub const AI_NOT_DETECTED: &str = "ai_not_detected";
    pub const AI_DETECTED: &str = "ai_detected";
    pub const AI_NOT_ANALYSED: &str = "ai_not_analysed";
}

const NOT_A_PAYSLIP_REASON: &str = "The document is not a valid payslip";
const AI_DETECTED_REASON: &str = "AI manipulation detected in the document";

/// The files received for one verification.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// Raster image used for AI detection (the client-side rendering of a
    /// PDF, or the upload itself).
    pub image: Option<UploadedDocument>,
    /// Original upload used for extraction and classification.
    pub original: UploadedDocument,
}

impl VerificationRequest {
    /// Pair the multipart `file` and `originalFile` fields. The original
    /// defaults to `file`; returns `None` when neither was sent.
    pub fn from_parts(
        file: Option<UploadedDocument>,
        original_file: Option<UploadedDocument>,
    ) -> Option<Self> {
        match (file, original_file) {
            (file, Some(original)) => Some(Self {
                image: file,
                original,
            }),
            (Some(file), None) => Some(Self {
                image: Some(file.clone()),
                original: file,
            }),
            (None, None) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Document extraction failed: {0}")]
    ExtractionFailed(#[source] CollaboratorError),
}

/// Sequences extraction, classification, AI detection and validation for
/// one upload and merges the results.
pub struct VerificationPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    classifier: Arc<dyn DocumentClassifier>,
    detector: Arc<dyn AiImageDetector>,
    extraction_fallback: ExtractionFallback,
}

/// Collects degraded-mode notices for the response.
#[derive(Default)]
struct Fallbacks {
    warnings: Vec<String>,
}

impl Fallbacks {
    fn record(&mut self, collaborator: &'static str, message: String) {
        warn!(collaborator = collaborator, "{}", message);
        metrics::counter!("collaborator_fallbacks_total", "collaborator" => collaborator)
            .increment(1);
        self.warnings.push(message);
    }
}

/// AI-detection step outcome, folded into the result.
struct AiVerdict {
    check: CheckResult,
    ai_generated: Option<bool>,
    breakdown: Option<AiBreakdown>,
}

impl VerificationPipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        classifier: Arc<dyn DocumentClassifier>,
        detector: Arc<dyn AiImageDetector>,
        extraction_fallback: ExtractionFallback,
    ) -> Self {
        Self {
            extractor,
            classifier,
            detector,
            extraction_fallback,
        }
    }

    /// Verify one upload as of `today`.
    pub async fn verify(
        &self,
        request: &VerificationRequest,
        today: NaiveDate,
    ) -> Result<VerificationResult, PipelineError> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        let mut fallbacks = Fallbacks::default();

        info!(
            request_id = %request_id,
            original_type = %request.original.content_type,
            original_bytes = request.original.len(),
            image_type = request.image.as_ref().map(|i| i.content_type.as_str()).unwrap_or("none"),
            "Verifying document"
        );

        // Extraction and AI detection read different representations of the
        // upload and do not depend on each other.
        let detection_input = rendering::detection_input(request.image.as_ref());
        let (extraction, detection) = tokio::join!(
            self.extractor.extract(&request.original),
            self.run_detection(&detection_input),
        );

        let extracted = self.resolve_extraction(extraction, &mut fallbacks)?;

        let mut checks = Vec::new();
        let mut reasons = Vec::new();

        // ── Classification ───────────────────────────────────────────────
        let (document_type, classification_check) = if extracted.looks_like_payslip() {
            (
                Classification::PAYSLIP.to_string(),
                CheckResult::success(
                    codes::DOCUMENT_TYPE,
                    "Document identified as: payslip",
                    format!(
                        "The document contains the fields expected on a payslip: employee name ({}), company ({}) and salary data.",
                        extracted.employee_name().unwrap_or("N/A"),
                        extracted.company_name().unwrap_or("N/A"),
                    ),
                ),
            )
        } else {
            let outcome = self.classifier.classify(&request.original).await;
            let classification = resolve_classification(outcome, &mut fallbacks);
            (
                classification.document_type.clone(),
                classification_check(&classification),
            )
        };
        if classification_check.is_failure() {
            reasons.push(NOT_A_PAYSLIP_REASON.to_string());
        }
        checks.push(classification_check);

        // ── AI detection ─────────────────────────────────────────────────
        let ai = resolve_detection(detection, &detection_input, &mut fallbacks);
        let fraudulent = ai.check.is_failure();
        if fraudulent {
            reasons.push(AI_DETECTED_REASON.to_string());
        }
        checks.push(ai.check);

        // ── Field validation ─────────────────────────────────────────────
        let report = validation::validate_payroll(&extracted, today);
        reasons.extend(report.reasons.iter().cloned());
        checks.extend(report.checks);

        let (status, reason) = if fraudulent {
            (VerificationStatus::Fraudulent, Some(AI_DETECTED_REASON.to_string()))
        } else if !reasons.is_empty() {
            (VerificationStatus::Invalid, reasons.first().cloned())
        } else {
            (VerificationStatus::Valid, None)
        };

        let failed = checks.iter().filter(|c| c.is_failure()).count();
        metrics::counter!("verifications_total", "status" => status.to_string()).increment(1);
        metrics::histogram!("verification_processing_seconds")
            .record(start.elapsed().as_secs_f64());

        info!(
            request_id = %request_id,
            status = %status,
            failed_checks = failed,
            degraded = !fallbacks.warnings.is_empty(),
            duration_ms = start.elapsed().as_millis(),
            "Verification complete"
        );

        Ok(VerificationResult {
            request_id,
            status,
            reason,
            reasons,
            checks,
            document_type,
            ai_generated: ai.ai_generated,
            ai_breakdown: ai.breakdown,
            extracted_data: extracted,
            warnings: fallbacks.warnings,
        })
    }

    async fn run_detection(
        &self,
        input: &DetectionInput<'_>,
    ) -> Option<CollaboratorOutcome<AiDetection>> {
        match input {
            DetectionInput::Image(image) => Some(self.detector.detect(image).await),
            DetectionInput::Skipped(_) => None,
        }
    }

    fn resolve_extraction(
        &self,
        outcome: CollaboratorOutcome<ExtractedPayrollData>,
        fallbacks: &mut Fallbacks,
    ) -> Result<ExtractedPayrollData, PipelineError> {
        match outcome {
            CollaboratorOutcome::Completed(data) => Ok(data),
            CollaboratorOutcome::Unconfigured => {
                fallbacks.record(
                    "extraction",
                    "Document extraction is not configured; demo fixture data was used instead of the uploaded document.".to_string(),
                );
                Ok(demo_payroll_record())
            }
            CollaboratorOutcome::Failed(e) => match self.extraction_fallback {
                ExtractionFallback::Fixture => {
                    fallbacks.record(
                        "extraction",
                        format!("Document extraction failed ({e}); demo fixture data was used instead of the uploaded document."),
                    );
                    Ok(demo_payroll_record())
                }
                ExtractionFallback::Reject => Err(PipelineError::ExtractionFailed(e)),
            },
        }
    }
}

fn resolve_classification(
    outcome: CollaboratorOutcome<Classification>,
    fallbacks: &mut Fallbacks,
) -> Classification {
    match outcome {
        CollaboratorOutcome::Completed(classification) => classification,
        CollaboratorOutcome::Unconfigured => {
            fallbacks.record(
                "classification",
                "Document classification is not configured; the document was assumed to be a payslip.".to_string(),
            );
            Classification {
                document_type: Classification::PAYSLIP.to_string(),
                confidence: DEMO_CLASSIFICATION_CONFIDENCE,
            }
        }
        CollaboratorOutcome::Failed(e) => {
            fallbacks.record(
                "classification",
                format!("Document classification failed ({e}); the document type is unknown."),
            );
            Classification {
                document_type: Classification::UNKNOWN.to_string(),
                confidence: FAILED_CLASSIFICATION_CONFIDENCE,
            }
        }
    }
}

fn classification_check(classification: &Classification) -> CheckResult {
    let label = format!("Document identified as: {}", classification.document_type);
    let explanation = format!(
        "The document was classified as \"{}\" with {:.1}% confidence.",
        classification.document_type,
        classification.confidence * 100.0
    );
    if classification.is_payslip() {
        CheckResult::success(codes::DOCUMENT_TYPE, label, explanation)
    } else {
        CheckResult::error(codes::DOCUMENT_TYPE_MISMATCH, label, explanation)
    }
}

fn resolve_detection(
    outcome: Option<CollaboratorOutcome<AiDetection>>,
    input: &DetectionInput<'_>,
    fallbacks: &mut Fallbacks,
) -> AiVerdict {
    let not_analysed = |explanation: String| AiVerdict {
        check: CheckResult::success(
            codes::AI_NOT_ANALYSED,
            "No AI manipulation detected",
            explanation,
        ),
        ai_generated: None,
        breakdown: None,
    };

    match (outcome, input) {
        (Some(CollaboratorOutcome::Completed(detection)), _) => {
            let percent = detection.confidence * 100.0;
            let check = if detection.is_ai_generated {
                CheckResult::error(
                    codes::AI_DETECTED,
                    format!("AI probability: {percent:.1}%"),
                    format!(
                        "AI-image detection estimates a {percent:.1}% probability that this document was generated or manipulated by artificial intelligence."
                    ),
                )
            } else {
                CheckResult::success(
                    codes::AI_NOT_DETECTED,
                    "No AI manipulation detected",
                    format!(
                        "AI-image detection estimates a low probability ({percent:.1}%) that this document was generated or manipulated by AI."
                    ),
                )
            };
            AiVerdict {
                check,
                ai_generated: Some(detection.is_ai_generated),
                breakdown: detection.breakdown,
            }
        }
        (Some(CollaboratorOutcome::Unconfigured), _) => {
            fallbacks.record(
                "detection",
                "AI-image detection is not configured; the document was not analysed.".to_string(),
            );
            not_analysed("AI-image detection is not configured for this deployment.".to_string())
        }
        (Some(CollaboratorOutcome::Failed(e)), _) => {
            fallbacks.record(
                "detection",
                format!("AI-image detection failed ({e}); the document was treated as not manipulated."),
            );
            not_analysed("AI-image detection was unavailable for this document.".to_string())
        }
        (None, DetectionInput::Skipped(reason)) => {
            info!(reason = %reason, "Skipping AI detection");
            not_analysed(format!("AI analysis is not available for this file: {reason}."))
        }
        (None, DetectionInput::Image(_)) => {
            not_analysed("AI analysis is not available for this file.".to_string())
        }
    }
}
