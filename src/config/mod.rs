use serde::Deserialize;
use std::time::Duration;

/// What to do when the document extractor is configured but fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExtractionFallback {
    /// Continue with the demo fixture record and a warning.
    #[default]
    Fixture,
    /// Fail the request with 502.
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// LandingAI ADE base URL (the `parse` and `extract` endpoints hang off it)
    #[serde(default = "default_extraction_api_url")]
    pub extraction_api_url: String,

    /// LandingAI API key. Unset means extraction and classification run in demo mode.
    #[serde(default)]
    pub extraction_api_key: Option<String>,

    /// AIorNOT synchronous image endpoint
    #[serde(default = "default_detection_api_url")]
    pub detection_api_url: String,

    /// AIorNOT API key. Unset means AI detection is skipped.
    #[serde(default)]
    pub detection_api_key: Option<String>,

    /// Bearer token required by `POST /api/v1/verify`
    #[serde(default)]
    pub api_shared_secret: Option<String>,

    /// Upload size ceiling for the public API, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Timeout for each outbound vendor call
    #[serde(default = "default_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Timeout for a whole inbound request
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub extraction_fallback: ExtractionFallback,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_extraction_api_url() -> String {
    "https://api.va.landing.ai/v1/ade".to_string()
}

fn default_detection_api_url() -> String {
    "https://api.aiornot.com/v2/image/sync".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport ceiling for request bodies. Multipart framing plus the
    /// optional second file can exceed `max_upload_bytes`, so the handler's
    /// own size check stays reachable.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_upload_bytes * 2 + 1024 * 1024
    }

    /// The shared secret, if one is set and non-blank.
    pub fn shared_secret(&self) -> Option<&str> {
        self.api_shared_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(60));
        assert_eq!(config.extraction_fallback, ExtractionFallback::Fixture);
        assert!(config.extraction_api_key.is_none());
        assert!(config.shared_secret().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("EXTRACTION_FALLBACK", "reject"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("API_SHARED_SECRET", "  "),
            ("DETECTION_API_KEY", "key"),
        ]);
        assert_eq!(config.extraction_fallback, ExtractionFallback::Reject);
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(config.shared_secret().is_none());
        assert_eq!(config.detection_api_key.as_deref(), Some("key"));
    }
}
