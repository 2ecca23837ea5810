//! LandingAI Agentic Document Extraction (ADE) client.
//!
//! Extraction is a two-step call: `parse` turns the upload into markdown,
//! then `extract` fills a JSON schema from that markdown. Classification
//! reuses the `parse` step and scores the markdown for payslip vocabulary.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use strsim::jaro_winkler;
use tracing::{info, warn};

use crate::models::document::UploadedDocument;
use crate::models::payroll::ExtractedPayrollData;
use crate::services::collaborator::{
    read_json, Classification, CollaboratorError, CollaboratorOutcome, DocumentClassifier,
    DocumentExtractor,
};

const SERVICE: &str = "LandingAI ADE";

/// Vocabulary that appears on Spanish payslips (accents folded).
const PAYSLIP_KEYWORDS: &[&str] = &[
    "nomina",
    "devengado",
    "devengos",
    "deducciones",
    "liquido",
    "percibir",
    "liquidacion",
    "irpf",
    "antiguedad",
    "cotizacion",
    "salario",
    "trabajador",
];

/// Keywords needed before a document is classified as a payslip.
const MIN_PAYSLIP_KEYWORDS: usize = 3;

/// Keyword count at which confidence saturates.
const FULL_CONFIDENCE_KEYWORDS: usize = 6;

/// Jaro-Winkler threshold tolerating OCR typos in keywords.
const KEYWORD_MATCH_THRESHOLD: f64 = 0.92;

/// Client for the LandingAI ADE `parse` and `extract` endpoints.
pub struct LandingAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ParseResponse {
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    extraction: Option<ExtractedPayrollData>,
}

impl LandingAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Convert a document into markdown via the `parse` endpoint.
    async fn parse_markdown(
        &self,
        api_key: &str,
        document: &UploadedDocument,
    ) -> Result<String, CollaboratorError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.upload_name())
            .mime_str(&document.content_type)?;
        let form = Form::new().part("document", part);

        let response = self
            .http
            .post(format!("{}/parse", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let parsed: ParseResponse = read_json(SERVICE, response).await?;
        Ok(parsed.markdown.unwrap_or_default())
    }

    /// Fill the payroll schema from parsed markdown via the `extract` endpoint.
    async fn extract_fields(
        &self,
        api_key: &str,
        markdown: String,
    ) -> Result<ExtractedPayrollData, CollaboratorError> {
        let form = Form::new()
            .text("markdown", markdown)
            .text("schema", extraction_schema().to_string());

        let response = self
            .http
            .post(format!("{}/extract", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let extracted: ExtractResponse = read_json(SERVICE, response).await?;
        extracted.extraction.ok_or(CollaboratorError::MissingField {
            service: SERVICE,
            field: "extraction",
        })
    }

    async fn parse_and_extract(
        &self,
        api_key: &str,
        document: &UploadedDocument,
    ) -> Result<ExtractedPayrollData, CollaboratorError> {
        let start = Instant::now();
        let markdown = self.parse_markdown(api_key, document).await?;
        let parse_ms = start.elapsed().as_millis();

        let data = self.extract_fields(api_key, markdown).await?;

        info!(
            parse_ms = parse_ms,
            total_ms = start.elapsed().as_millis(),
            marker_fields = data.payslip_marker_count(),
            "Payroll extraction complete"
        );
        Ok(data)
    }
}

#[async_trait]
impl DocumentExtractor for LandingAiClient {
    async fn extract(&self, document: &UploadedDocument) -> CollaboratorOutcome<ExtractedPayrollData> {
        let Some(api_key) = self.api_key.as_deref() else {
            return CollaboratorOutcome::Unconfigured;
        };

        let result = self.parse_and_extract(api_key, document).await;
        if let Err(e) = &result {
            warn!(error = %e, "Payroll extraction failed");
        }
        CollaboratorOutcome::from_result(result)
    }
}

#[async_trait]
impl DocumentClassifier for LandingAiClient {
    async fn classify(&self, document: &UploadedDocument) -> CollaboratorOutcome<Classification> {
        let Some(api_key) = self.api_key.as_deref() else {
            return CollaboratorOutcome::Unconfigured;
        };

        let result = self
            .parse_markdown(api_key, document)
            .await
            .map(|markdown| classify_markdown(&markdown));
        match &result {
            Ok(classification) => info!(
                document_type = %classification.document_type,
                confidence = classification.confidence,
                "Document classified"
            ),
            Err(e) => warn!(error = %e, "Document classification failed"),
        }
        CollaboratorOutcome::from_result(result)
    }
}

/// Classify parsed markdown by counting payslip keywords.
pub fn classify_markdown(markdown: &str) -> Classification {
    let words: Vec<String> = markdown
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= 4)
        .map(fold_accents)
        .collect();

    let matched = PAYSLIP_KEYWORDS
        .iter()
        .filter(|keyword| {
            words
                .iter()
                .any(|word| jaro_winkler(word, keyword) >= KEYWORD_MATCH_THRESHOLD)
        })
        .count();

    let document_type = if matched >= MIN_PAYSLIP_KEYWORDS {
        Classification::PAYSLIP
    } else {
        Classification::UNKNOWN
    };

    Classification {
        document_type: document_type.to_string(),
        confidence: (matched as f64 / FULL_CONFIDENCE_KEYWORDS as f64).min(1.0),
    }
}

/// Lowercase and strip Spanish diacritics.
fn fold_accents(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// JSON schema sent to the `extract` endpoint. Property names match the
/// camelCase fields of [`ExtractedPayrollData`].
pub fn extraction_schema() -> serde_json::Value {
    let line_items = |description: &str| {
        serde_json::json!({
            "type": "array",
            "description": description,
            "items": {
                "type": "object",
                "properties": {
                    "concept": { "type": "string", "description": "Nombre del concepto" },
                    "amount": { "type": "number", "description": "Importe del concepto" }
                }
            }
        })
    };

    serde_json::json!({
        "type": "object",
        "properties": {
            "employeeName": { "type": "string", "description": "Nombre completo del empleado" },
            "employeeNationalId": { "type": "string", "description": "NIF o DNI del empleado" },
            "companyName": { "type": "string", "description": "Nombre de la empresa" },
            "companyTaxId": { "type": "string", "description": "CIF de la empresa" },
            "payrollDate": { "type": "string", "description": "Fecha de la nómina (YYYY-MM-DD)" },
            "liquidationPeriod": { "type": "string", "description": "Periodo de liquidación" },
            "seniorityDate": { "type": "string", "description": "Fecha de antigüedad del empleado (YYYY-MM-DD)" },
            "totalEarnings": { "type": "number", "description": "Total devengado" },
            "totalDeductions": { "type": "number", "description": "Total deducido" },
            "netSalary": { "type": "number", "description": "Líquido a percibir" },
            "earningItems": line_items("Lista de conceptos devengados individuales"),
            "deductionItems": line_items("Lista de conceptos deducidos individuales")
        }
    })
}
