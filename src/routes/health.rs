use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize, Deserialize)]
pub struct HealthChecks {
    pub classifier: ComponentHealth,
    pub runner: RunnerHealth,
}

#[derive(Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct RunnerHealth {
    pub workers: usize,
    pub queue_depth: usize,
}

/// GET /health: classifier availability and worker pool load.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let classifier_ok = state.processor.classifier().is_some();
    let runner = state.processor.runner();

    let status_code = if classifier_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if classifier_ok {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            classifier: ComponentHealth {
                status: if classifier_ok { "ok" } else { "error" }.to_string(),
            },
            runner: RunnerHealth {
                workers: runner.workers(),
                queue_depth: runner.queue_depth(),
            },
        },
    };

    (status_code, Json(response))
}
