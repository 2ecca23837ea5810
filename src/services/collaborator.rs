//! Interfaces to the third-party services the pipeline depends on.
//!
//! Each call returns a [`CollaboratorOutcome`] instead of silently swapping in
//! mock data: the pipeline decides what a failure or a missing credential
//! means for the verdict.

use async_trait::async_trait;

use crate::models::document::UploadedDocument;
use crate::models::payroll::ExtractedPayrollData;
use crate::models::verification::AiBreakdown;

/// Result of calling an external collaborator.
#[derive(Debug)]
pub enum CollaboratorOutcome<T> {
    Completed(T),
    Failed(CollaboratorError),
    /// No credentials configured (offline/demo mode).
    Unconfigured,
}

impl<T> CollaboratorOutcome<T> {
    pub fn from_result(result: Result<T, CollaboratorError>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(e) => Self::Failed(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} response is missing {field}")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },
}

/// Classifier verdict for a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub document_type: String,
    pub confidence: f64,
}

impl Classification {
    pub const PAYSLIP: &'static str = "payslip";
    pub const UNKNOWN: &'static str = "unknown";

    pub fn is_payslip(&self) -> bool {
        matches!(
            self.document_type.to_ascii_lowercase().as_str(),
            "payslip" | "payroll" | "nomina" | "nómina"
        )
    }
}

/// AI-generation verdict for an image.
#[derive(Debug, Clone, PartialEq)]
pub struct AiDetection {
    pub is_ai_generated: bool,
    pub confidence: f64,
    pub breakdown: Option<AiBreakdown>,
}

/// Turns an uploaded payslip into structured fields.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, document: &UploadedDocument) -> CollaboratorOutcome<ExtractedPayrollData>;
}

/// Decides what kind of document an upload is.
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    async fn classify(&self, document: &UploadedDocument) -> CollaboratorOutcome<Classification>;
}

/// Estimates whether an image was generated or manipulated by AI.
#[async_trait]
pub trait AiImageDetector: Send + Sync {
    async fn detect(&self, image: &UploadedDocument) -> CollaboratorOutcome<AiDetection>;
}

/// Read a vendor response, mapping non-2xx statuses and malformed bodies to
/// [`CollaboratorError`].
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, CollaboratorError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(CollaboratorError::Status {
            service,
            status: status.as_u16(),
            body: truncate(&body, 500),
        });
    }

    serde_json::from_str(&body).map_err(|source| CollaboratorError::Parse { service, source })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    /// Serve canned vendor answers on an ephemeral port.
    async fn spawn_vendor() -> String {
        let app = Router::new()
            .route(
                "/unavailable",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream overloaded") }),
            )
            .route("/garbage", get(|| async { "<html>not json</html>" }))
            .route("/ok", get(|| async { r#"{"value": 7}"# }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        value: u32,
    }

    #[tokio::test]
    async fn test_read_json_maps_status_and_parse_errors() {
        let base = spawn_vendor().await;
        let client = reqwest::Client::new();

        let response = client.get(format!("{base}/unavailable")).send().await.unwrap();
        match read_json::<Sample>("vendor", response).await {
            Err(CollaboratorError::Status {
                service,
                status,
                body,
            }) => {
                assert_eq!(service, "vendor");
                assert_eq!(status, 503);
                assert_eq!(body, "upstream overloaded");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let response = client.get(format!("{base}/garbage")).send().await.unwrap();
        let err = read_json::<Sample>("vendor", response).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Parse { service: "vendor", .. }));

        let response = client.get(format!("{base}/ok")).send().await.unwrap();
        let sample = read_json::<Sample>("vendor", response).await.unwrap();
        assert_eq!(sample.value, 7);
    }

    #[test]
    fn test_payslip_aliases() {
        for document_type in ["payslip", "payroll", "nomina", "Nómina"] {
            let classification = Classification {
                document_type: document_type.to_string(),
                confidence: 0.9,
            };
            assert!(classification.is_payslip(), "{document_type}");
        }
        let invoice = Classification {
            document_type: "invoice".to_string(),
            confidence: 0.9,
        };
        assert!(!invoice.is_payslip());
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: CollaboratorOutcome<u8> = CollaboratorOutcome::from_result(Ok(1));
        assert!(matches!(ok, CollaboratorOutcome::Completed(1)));

        let err: CollaboratorOutcome<u8> =
            CollaboratorOutcome::from_result(Err(CollaboratorError::MissingField {
                service: "test",
                field: "value",
            }));
        assert!(matches!(err, CollaboratorOutcome::Failed(_)));
    }
}
