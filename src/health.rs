use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{app_state::AppState, config::Config};

#[derive(Serialize, ToSchema)]
pub struct LivenessResponse {
    status: String,
}

/// Which upstream integrations have credentials.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceStatus {
    status: String,
    services: BTreeMap<String, String>,
}

impl ServiceStatus {
    pub fn from_config(config: &Config) -> Self {
        let services = config
            .credential_status()
            .into_iter()
            .map(|(name, configured)| {
                let state = if configured { "configured" } else { "missing" };
                (name.to_string(), state.to_string())
            })
            .collect();
        Self {
            status: "OK".to_string(),
            services,
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Server is running", body = LivenessResponse))
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "Server is running".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Credential status per upstream", body = ServiceStatus))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.status.as_ref().clone())
}
