//! Shared domain types for the roomdesk workspace.
//!
//! Holds the types both tiers agree on: room identifiers, the room shape
//! served by the booking API, the availability tri-state, and the domain
//! error taxonomy.

pub mod error;
pub mod room;
pub mod types;
