use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::health::HealthReport;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub services: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// Liveness of the gateway process itself; always healthy when it answers.
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub services: HealthReport,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        message: "Evid Flow MEAL Automation Suite - API Gateway",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        services: state.registry.names().into_iter().map(String::from).collect(),
    })
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let services = state.health.check_all().await;

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
        services,
    })
}
