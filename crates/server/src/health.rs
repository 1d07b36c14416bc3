use api_types::health::Health;
use axum::{Json, extract::State, http::StatusCode};

use crate::server::ServerState;

/// Liveness plus store connectivity.
pub async fn get(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    match state.engine.ping().await {
        Ok(()) => (StatusCode::OK, Json(Health::connected())),
        Err(err) => {
            tracing::warn!("health check failed: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health::disconnected()))
        }
    }
}
