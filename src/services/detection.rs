use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::models::document::UploadedDocument;
use crate::models::verification::AiBreakdown;
use crate::services::collaborator::{
    read_json, AiDetection, AiImageDetector, CollaboratorError, CollaboratorOutcome,
};

const SERVICE: &str = "AIorNOT";

/// AI probability above which an image is reported as AI-generated.
const AI_GENERATED_THRESHOLD: f64 = 0.5;

/// Client for the AIorNOT synchronous image detection API.
pub struct AiOrNotClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiOrNotResponse {
    #[serde(default)]
    report: Option<Report>,
}

#[derive(Debug, Default, Deserialize)]
struct Report {
    #[serde(default)]
    ai_generated: Option<AiGeneratedReport>,
    #[serde(default)]
    deepfake: Option<Score>,
    #[serde(default)]
    nsfw: Option<Score>,
}

#[derive(Debug, Default, Deserialize)]
struct AiGeneratedReport {
    #[serde(default)]
    ai: Option<Score>,
    // Per-generator scores; entries without a confidence are ignored.
    #[serde(default)]
    generator: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct Score {
    #[serde(default)]
    confidence: Option<f64>,
}

fn confidence(score: &Option<Score>) -> f64 {
    score.as_ref().and_then(|s| s.confidence).unwrap_or(0.0)
}

impl AiOrNotResponse {
    /// Reduce the vendor report to a detection verdict and breakdown.
    pub fn into_detection(self) -> AiDetection {
        let report = self.report.unwrap_or_default();
        let ai_generated = report.ai_generated.unwrap_or_default();

        let ai_probability = confidence(&ai_generated.ai);
        let class_probabilities: BTreeMap<String, f64> = ai_generated
            .generator
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .get("confidence")
                    .and_then(serde_json::Value::as_f64)
                    .map(|c| (name, c))
            })
            .collect();

        let breakdown = AiBreakdown {
            ai_probability,
            fake_probability: confidence(&report.deepfake),
            nsfw_probability: confidence(&report.nsfw),
            class_probabilities: (!class_probabilities.is_empty()).then_some(class_probabilities),
        };

        AiDetection {
            is_ai_generated: ai_probability > AI_GENERATED_THRESHOLD,
            confidence: ai_probability,
            breakdown: Some(breakdown),
        }
    }
}

impl AiOrNotClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn submit(
        &self,
        api_key: &str,
        image: &UploadedDocument,
    ) -> Result<AiDetection, CollaboratorError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.upload_name())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("image", part);

        let start = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let body: AiOrNotResponse = read_json(SERVICE, response).await?;
        let detection = body.into_detection();

        info!(
            duration_ms = start.elapsed().as_millis(),
            ai_probability = detection.confidence,
            ai_generated = detection.is_ai_generated,
            "AI detection complete"
        );
        Ok(detection)
    }
}

#[async_trait]
impl AiImageDetector for AiOrNotClient {
    async fn detect(&self, image: &UploadedDocument) -> CollaboratorOutcome<AiDetection> {
        let Some(api_key) = self.api_key.as_deref() else {
            return CollaboratorOutcome::Unconfigured;
        };

        let result = self.submit(api_key, image).await;
        if let Err(e) = &result {
            warn!(error = %e, "AI detection failed");
        }
        CollaboratorOutcome::from_result(result)
    }
}
