#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use roomdesk_api::config::ServerConfig;
use roomdesk_api::router::build_app_router;
use roomdesk_api::state::AppState;
use roomdesk_db::repositories::RoomRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This delegates to the same `build_app_router` production uses, so tests
/// exercise the identical middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState { pool };
    build_app_router(state, &config)
}

/// Issue a GET request against the app and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Seed one room document (the key is stamped into the document as `_id`).
pub async fn seed_room(pool: &PgPool, room_id: &str, document: serde_json::Value) {
    RoomRepo::insert(pool, room_id, document)
        .await
        .expect("seeding a room should succeed");
}
