//! Room directory routes: per-room pricing lookup and the full room list.

use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use serde_json::Value;

use roomdesk_core::error::CoreError;
use roomdesk_db::repositories::RoomRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the pricing lookup.
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub id: Option<String>,
}

/// GET /price?id=<id>
///
/// Looks up one room document and returns only its pricing fields;
/// `_id`, `name`, `locationId`, and `capacity` are projected away.
/// Missing or empty `id` is a 400; an unknown id is a distinct 404
/// rather than a `null` body.
async fn get_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> AppResult<Json<Value>> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: id".to_string()))?;

    match RoomRepo::find_price(&state.pool, &id).await? {
        Some(pricing) => Ok(Json(pricing)),
        None => Err(AppError::Core(CoreError::NotFound { entity: "Room", id })),
    }
}

/// GET /rooms
///
/// Returns every room document in the collection as a bare JSON array,
/// unfiltered and unprojected.
async fn list_rooms(State(state): State<AppState>) -> AppResult<Json<Vec<Value>>> {
    let rooms = RoomRepo::list_all(&state.pool).await?;
    Ok(Json(rooms))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price", get(get_price))
        .route("/rooms", get(list_rooms))
}
