use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use payslip_verify::app_state::AppState;
use payslip_verify::config::AppConfig;
use payslip_verify::routes;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing payslip-verify server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);
    routes::metrics::describe_metrics();

    if config.extraction_api_key.is_none() {
        tracing::warn!("EXTRACTION_API_KEY not set; extraction will return demo fixture data");
    }
    if config.detection_api_key.is_none() {
        tracing::warn!("DETECTION_API_KEY not set; AI detection is disabled");
    }
    if config.shared_secret().is_none() {
        tracing::warn!("API_SHARED_SECRET not set; /api/v1/verify will reject every request");
    }

    let state = AppState::from_config(&config).expect("Failed to initialize HTTP clients");

    let app = routes::router(state, config.body_limit_bytes(), config.request_timeout())
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        );

    tracing::info!(
        extraction_fallback = %config.extraction_fallback,
        max_upload_bytes = config.max_upload_bytes,
        "Starting payslip-verify on {}",
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
