//! Test helpers: fake collaborators, router construction and multipart bodies
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use payslip_verify::app_state::{AppState, CollaboratorStatus};
use payslip_verify::config::ExtractionFallback;
use payslip_verify::models::api::UploadLimits;
use payslip_verify::models::document::UploadedDocument;
use payslip_verify::models::payroll::ExtractedPayrollData;
use payslip_verify::models::verification::AiBreakdown;
use payslip_verify::routes;
use payslip_verify::services::collaborator::{
    AiDetection, AiImageDetector, Classification, CollaboratorError, CollaboratorOutcome,
    DocumentClassifier, DocumentExtractor,
};
use payslip_verify::services::pipeline::VerificationPipeline;

pub const API_KEY: &str = "test-shared-secret";
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const BOUNDARY: &str = "payslip-verify-test-boundary";

/// Scripted extraction behaviour.
#[derive(Clone)]
pub enum FakeExtraction {
    Returns(ExtractedPayrollData),
    Unconfigured,
    Fails,
    /// Answers `Unconfigured` after the delay.
    Slow(Duration),
}

#[async_trait]
impl DocumentExtractor for FakeExtraction {
    async fn extract(&self, _: &UploadedDocument) -> CollaboratorOutcome<ExtractedPayrollData> {
        match self {
            FakeExtraction::Returns(data) => CollaboratorOutcome::Completed(data.clone()),
            FakeExtraction::Unconfigured => CollaboratorOutcome::Unconfigured,
            FakeExtraction::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                CollaboratorOutcome::Unconfigured
            }
            FakeExtraction::Fails => CollaboratorOutcome::Failed(CollaboratorError::Status {
                service: "LandingAI ADE",
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }
}

pub struct FakeClassifier(pub &'static str);

#[async_trait]
impl DocumentClassifier for FakeClassifier {
    async fn classify(&self, _: &UploadedDocument) -> CollaboratorOutcome<Classification> {
        CollaboratorOutcome::Completed(Classification {
            document_type: self.0.to_string(),
            confidence: 0.9,
        })
    }
}

/// Detector reporting a fixed AI probability.
pub struct FakeDetector(pub f64);

#[async_trait]
impl AiImageDetector for FakeDetector {
    async fn detect(&self, _: &UploadedDocument) -> CollaboratorOutcome<AiDetection> {
        CollaboratorOutcome::Completed(AiDetection {
            is_ai_generated: self.0 > 0.5,
            confidence: self.0,
            breakdown: Some(AiBreakdown {
                ai_probability: self.0,
                ..Default::default()
            }),
        })
    }
}

/// Router options for a test app.
pub struct TestApp {
    pub extraction: FakeExtraction,
    pub ai_probability: f64,
    pub fallback: ExtractionFallback,
    pub shared_secret: Option<&'static str>,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

impl TestApp {
    pub fn new(extraction: FakeExtraction) -> Self {
        Self {
            extraction,
            ai_probability: 0.02,
            fallback: ExtractionFallback::Fixture,
            shared_secret: Some(API_KEY),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn router(self) -> Router {
        let pipeline = VerificationPipeline::new(
            Arc::new(self.extraction),
            Arc::new(FakeClassifier("payslip")),
            Arc::new(FakeDetector(self.ai_probability)),
            self.fallback,
        );
        let state = AppState::new(
            pipeline,
            UploadLimits {
                max_bytes: self.max_upload_bytes,
            },
            self.shared_secret,
            CollaboratorStatus::default(),
        );
        routes::router(
            state,
            self.max_upload_bytes * 2 + 1024 * 1024,
            self.request_timeout,
        )
    }
}

/// One multipart part: field name, file name, content type, bytes.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            bytes,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            bytes: value.as_bytes(),
        }
    }
}

/// Encode `parts` as a multipart/form-data body.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart POST request, optionally with a bearer token.
pub fn multipart_request(uri: &str, parts: &[Part<'_>], bearer: Option<&str>) -> Request<Body> {
    let body = multipart_body(parts);
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len());
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Upload a document to a running server with `reqwest`.
pub async fn upload_document(
    client: &reqwest::Client,
    url: &str,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
    bearer: Option<&str>,
) -> Result<(reqwest::StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?,
    );

    let mut request = client.post(url).multipart(form);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.json::<serde_json::Value>().await?;
    Ok((status, body))
}
