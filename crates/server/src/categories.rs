use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn list(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(
        state
            .engine
            .categories()
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )
}
