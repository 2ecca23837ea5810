use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub extraction: ComponentHealth,
    pub detection: ComponentHealth,
    pub public_api: ComponentHealth,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: String,
}

impl ComponentHealth {
    fn configured(configured: bool) -> Self {
        Self {
            status: if configured { "configured" } else { "demo" }.to_string(),
        }
    }
}

/// GET /health: liveness plus which collaborators have credentials.
///
/// Unconfigured collaborators are a supported demo mode, so this always
/// answers 200.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let collaborators = state.collaborators;
    let degraded = !(collaborators.extraction && collaborators.detection);

    Json(HealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            extraction: ComponentHealth::configured(collaborators.extraction),
            detection: ComponentHealth::configured(collaborators.detection),
            public_api: ComponentHealth::configured(state.shared_secret.is_some()),
        },
    })
}
