use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::server::PatientServer;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    pub version: String,
    /// Individual dependency checks
    pub checks: HashMap<String, String>,
}

/// Health check handler; 503 when the patient store cannot be reached.
pub async fn health_check(
    State(server): State<PatientServer>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_healthy = server.patients.is_healthy().await;

    let mut checks = HashMap::new();
    checks.insert(
        "patient_store".to_string(),
        if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
    );

    let (status_code, status) = if store_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    (status_code, Json(response))
}
