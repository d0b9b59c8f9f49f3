//! Row types for the `rooms` table.

use serde::Serialize;

/// A stored room document plus its key column.
///
/// The document is kept whole (schemaless JSONB); `room_id` duplicates the
/// document's `_id` field so lookups stay keyed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RoomRecord {
    pub room_id: String,
    pub document: serde_json::Value,
}
