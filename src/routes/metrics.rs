use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// GET /metrics: Prometheus text exposition of the verification counters.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}

/// Register descriptions for the metrics the pipeline records.
pub fn describe_metrics() {
    metrics::describe_counter!(
        "verifications_total",
        "Completed verifications, labelled by resulting status"
    );
    metrics::describe_counter!(
        "collaborator_fallbacks_total",
        "Verifications that used a fallback because a collaborator was unconfigured or failed"
    );
    metrics::describe_histogram!(
        "verification_processing_seconds",
        "Time to run the verification pipeline for one upload"
    );
}
