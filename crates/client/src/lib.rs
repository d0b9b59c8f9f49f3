//! Booking client: the interaction layer that authenticates a user,
//! fetches rooms from the external booking API, and drives the
//! price → availability → book flow.
//!
//! The flow is modelled as a small state machine ([`flow::BookingClient`])
//! over a gateway trait ([`gateway::BookingGateway`]), so the whole
//! interaction is testable without a network.

pub mod flow;
pub mod gateway;
pub mod identity;
pub mod session;
