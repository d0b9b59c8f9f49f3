/// Room identifiers are opaque strings assigned by the store (`_id`).
pub type RoomId = String;
