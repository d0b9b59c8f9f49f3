/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable. The pool is the only injected dependency:
/// handlers never reach for process-global connection state, and
/// configuration stays with the router builder that consumes it.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: roomdesk_db::DbPool,
}
