//! Room and availability types shared with the booking client.

use serde::{Deserialize, Serialize};

use crate::types::RoomId;

/// A room as served by the external booking API.
///
/// The API serves rooms with `room_id`/`location_id`/`name`/`capacity`/
/// `basePrice` keys; anything else the payload carries is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,
    pub location_id: String,
    pub name: String,
    pub capacity: i32,
    #[serde(rename = "basePrice")]
    pub base_price: f64,
}

/// Whether a room can be booked on a given date.
///
/// `Unknown` is a first-class state, not an absent boolean: the
/// availability check is best-effort and its failure degrades to
/// `Unknown` without blocking the price display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Unknown,
    Available,
    Unavailable,
}

impl Availability {
    /// Only `Available` permits a booking attempt.
    pub fn is_bookable(self) -> bool {
        matches!(self, Availability::Available)
    }
}
