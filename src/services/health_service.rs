use crate::{dto::health::HealthResponse, state::SharedState};

/// Current health of the backend, reflecting degraded mode.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
