use axum::Router;

use crate::state::AppState;

pub mod ping;
pub mod rooms;

/// All routes live at root level: this service predates any versioned
/// prefix and its consumers hardcode `/price`, `/rooms`, and `/ping`.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(ping::router()).merge(rooms::router())
}
