use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::api::UploadLimits;
use crate::services::{
    collaborator::{AiImageDetector, DocumentClassifier, DocumentExtractor},
    detection::AiOrNotClient,
    extraction::LandingAiClient,
    pipeline::VerificationPipeline,
};

/// Which collaborators have credentials, reported by `/health`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollaboratorStatus {
    pub extraction: bool,
    pub detection: bool,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,
    pub limits: UploadLimits,
    pub shared_secret: Option<Arc<str>>,
    pub collaborators: CollaboratorStatus,
}

impl AppState {
    pub fn new(
        pipeline: VerificationPipeline,
        limits: UploadLimits,
        shared_secret: Option<&str>,
        collaborators: CollaboratorStatus,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            limits,
            shared_secret: shared_secret.map(Arc::from),
            collaborators,
        }
    }

    /// Wire the vendor clients described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let landing_ai = Arc::new(LandingAiClient::new(
            config.extraction_api_url.clone(),
            config.extraction_api_key.clone(),
            config.upstream_timeout(),
        )?);
        let ai_or_not = Arc::new(AiOrNotClient::new(
            config.detection_api_url.clone(),
            config.detection_api_key.clone(),
            config.upstream_timeout(),
        )?);

        let collaborators = CollaboratorStatus {
            extraction: landing_ai.is_configured(),
            detection: ai_or_not.is_configured(),
        };

        let extractor: Arc<dyn DocumentExtractor> = landing_ai.clone();
        let classifier: Arc<dyn DocumentClassifier> = landing_ai;
        let detector: Arc<dyn AiImageDetector> = ai_or_not;
        let pipeline =
            VerificationPipeline::new(extractor, classifier, detector, config.extraction_fallback);

        Ok(Self::new(
            pipeline,
            UploadLimits {
                max_bytes: config.max_upload_bytes,
            },
            config.shared_secret(),
            collaborators,
        ))
    }
}
