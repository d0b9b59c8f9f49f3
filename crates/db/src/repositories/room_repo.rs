//! Repository for the `rooms` document collection.
//!
//! Read paths only as far as the HTTP surface is concerned; `insert` exists
//! for seeding (tests, fixtures) and is never reachable from a route.

use serde_json::Value;
use sqlx::PgPool;

use crate::models::room::RoomRecord;

/// Fields stripped from a document by the `/price` projection.
const PRICE_PROJECTION: &str = "{_id,name,locationId,capacity}";

/// Document reads for the room directory.
pub struct RoomRepo;

impl RoomRepo {
    /// Look up one room by id, projecting away everything that is not a
    /// pricing field.
    ///
    /// Returns `None` when no document carries that id. An empty object is
    /// a real (if degenerate) result: a document that has no pricing
    /// fields beyond the projected ones.
    pub async fn find_price(pool: &PgPool, id: &str) -> Result<Option<Value>, sqlx::Error> {
        let query = format!(
            "SELECT document - '{PRICE_PROJECTION}'::text[] FROM rooms WHERE room_id = $1"
        );
        sqlx::query_scalar::<_, Value>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every document in the collection, unprojected and unpaginated.
    ///
    /// Unbounded by design (the collection is expected to stay small); the
    /// scaling risk is accepted, not mitigated.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Value>, sqlx::Error> {
        sqlx::query_scalar::<_, Value>("SELECT document FROM rooms ORDER BY room_id")
            .fetch_all(pool)
            .await
    }

    /// Insert a room document, stamping the key into the document as `_id`
    /// so stored documents always carry their own id.
    ///
    /// Seeding only -- no HTTP route writes.
    pub async fn insert(
        pool: &PgPool,
        room_id: &str,
        document: Value,
    ) -> Result<RoomRecord, sqlx::Error> {
        sqlx::query_as::<_, RoomRecord>(
            "INSERT INTO rooms (room_id, document) \
             VALUES ($1, $2 || jsonb_build_object('_id', $1::text)) \
             RETURNING room_id, document",
        )
        .bind(room_id)
        .bind(document)
        .fetch_one(pool)
        .await
    }
}
