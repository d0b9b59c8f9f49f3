use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness probe response payload.
#[derive(Serialize)]
pub struct PingResponse {
    /// Overall service status; always `ok` -- this route never errors.
    pub status: &'static str,
    /// Whether the store connection is currently established.
    pub db: bool,
}

/// GET /ping -- liveness probe.
///
/// Reports the pool's connection state without issuing a round-trip
/// query, so a hung store cannot stall the probe.
async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        db: !state.pool.is_closed(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
