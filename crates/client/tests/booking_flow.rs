//! Tests for the booking interaction state machine, driven through a stub
//! gateway so no network is involved.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use roomdesk_client::flow::{BookingClient, BookingFlow, RoomsState};
use roomdesk_client::gateway::{BookingGateway, GatewayError};
use roomdesk_client::session::{Session, UserSession};
use roomdesk_core::room::{Availability, Room};

// ---------------------------------------------------------------------------
// Stub gateway
// ---------------------------------------------------------------------------

/// Canned responses per operation; `None` means the call fails.
struct StubGateway {
    rooms: Option<Vec<Room>>,
    price: Option<f64>,
    availability: Option<bool>,
    booking_ok: bool,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl StubGateway {
    fn new() -> Self {
        Self {
            rooms: Some(vec![oak(), pine()]),
            price: Some(60.0),
            availability: Some(true),
            booking_ok: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail(op: &str) -> GatewayError {
        GatewayError::Malformed(format!("stubbed {op} failure"))
    }
}

#[async_trait]
impl BookingGateway for StubGateway {
    async fn get_rooms(&self, _token: &str) -> Result<Vec<Room>, GatewayError> {
        self.record("get_rooms");
        self.rooms.clone().ok_or_else(|| Self::fail("get_rooms"))
    }

    async fn calc_price(
        &self,
        _token: &str,
        _date: NaiveDate,
        _location_id: &str,
        _room_id: &str,
    ) -> Result<f64, GatewayError> {
        self.record("calc_price");
        self.price.ok_or_else(|| Self::fail("calc_price"))
    }

    async fn check_availability(
        &self,
        _token: &str,
        _date: NaiveDate,
        _room_id: &str,
    ) -> Result<bool, GatewayError> {
        self.record("check_availability");
        self.availability
            .ok_or_else(|| Self::fail("check_availability"))
    }

    async fn make_booking(
        &self,
        _token: &str,
        _user_id: &str,
        _date: NaiveDate,
        _room_id: &str,
    ) -> Result<Value, GatewayError> {
        self.record("make_booking");
        if self.booking_ok {
            Ok(json!({ "confirmed": true }))
        } else {
            Err(Self::fail("make_booking"))
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn oak() -> Room {
    Room {
        room_id: "room-1".to_string(),
        location_id: "L1".to_string(),
        name: "Oak".to_string(),
        capacity: 4,
        base_price: 50.0,
    }
}

fn pine() -> Room {
    Room {
        room_id: "room-2".to_string(),
        location_id: "L2".to_string(),
        name: "Pine".to_string(),
        capacity: 8,
        base_price: 90.0,
    }
}

fn user() -> UserSession {
    UserSession {
        id_token: "token-abc".to_string(),
        subject: "user-42".to_string(),
        email: Some("user@example.com".to_string()),
    }
}

fn a_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

/// A client signed in with rooms loaded and the Oak room's modal open.
async fn client_with_open_modal(stub: StubGateway) -> BookingClient<StubGateway> {
    let mut client = BookingClient::new(stub);
    client.sign_in(user()).await;
    assert!(client.select_room("room-1"));
    client
}

// ---------------------------------------------------------------------------
// Rooms fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_in_loads_rooms() {
    let mut client = BookingClient::new(StubGateway::new());
    client.sign_in(user()).await;

    assert_matches!(client.rooms(), RoomsState::Loaded(rooms) if rooms.len() == 2);
    assert_eq!(client.loaded_rooms()[0].name, "Oak");
}

#[tokio::test]
async fn rooms_fetch_failure_surfaces_message() {
    let mut stub = StubGateway::new();
    stub.rooms = None;

    let mut client = BookingClient::new(stub);
    client.sign_in(user()).await;

    assert_matches!(client.rooms(), RoomsState::Failed(msg) if msg.contains("get_rooms"));
}

#[tokio::test]
async fn stale_fetch_after_sign_out_is_discarded() {
    let mut client = BookingClient::new(StubGateway::new());
    client.set_session(Session::Authenticated(user()));

    // Fetch starts, then the user signs out before it resolves.
    let fetch = client.begin_rooms_fetch().expect("signed in");
    client.sign_out();

    client.complete_rooms_fetch(fetch.epoch, Ok(vec![oak()]));

    // The late result must be discarded, not applied to signed-out state.
    assert_matches!(client.rooms(), RoomsState::Idle);
    assert!(client.loaded_rooms().is_empty());
}

#[tokio::test]
async fn older_fetch_loses_to_newer_fetch() {
    let mut client = BookingClient::new(StubGateway::new());
    client.set_session(Session::Authenticated(user()));

    let first = client.begin_rooms_fetch().unwrap();
    let second = client.begin_rooms_fetch().unwrap();

    // The superseded fetch resolves late and is ignored.
    client.complete_rooms_fetch(first.epoch, Ok(vec![oak()]));
    assert_matches!(client.rooms(), RoomsState::Loading);

    client.complete_rooms_fetch(second.epoch, Ok(vec![oak(), pine()]));
    assert_matches!(client.rooms(), RoomsState::Loaded(rooms) if rooms.len() == 2);
}

// ---------------------------------------------------------------------------
// Session transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_failure_clears_rooms_and_closes_the_modal() {
    let mut client = client_with_open_modal(StubGateway::new()).await;
    client.submit_date(a_date()).await;
    assert!(client.can_book());

    client.set_session(Session::Failed("provider unreachable".to_string()));

    // Any transition away from Authenticated resets the interaction.
    assert_matches!(client.session(), Session::Failed(msg) if msg == "provider unreachable");
    assert_matches!(client.rooms(), RoomsState::Idle);
    assert_matches!(client.flow(), BookingFlow::Closed);
    assert!(!client.can_book());
}

#[tokio::test]
async fn loading_session_discards_an_in_flight_fetch() {
    let mut client = BookingClient::new(StubGateway::new());
    client.set_session(Session::Authenticated(user()));
    let fetch = client.begin_rooms_fetch().expect("signed in");

    // The provider starts re-resolving before the fetch lands.
    client.set_session(Session::Loading);
    client.complete_rooms_fetch(fetch.epoch, Ok(vec![oak()]));

    assert_matches!(client.rooms(), RoomsState::Idle);
    assert!(client.loaded_rooms().is_empty());
}

// ---------------------------------------------------------------------------
// Modal lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selecting_a_room_opens_date_entry() {
    let client = client_with_open_modal(StubGateway::new()).await;

    assert_matches!(client.flow(), BookingFlow::DateEntry { room } if room.room_id == "room-1");
    assert_eq!(client.availability(), Availability::Unknown);
}

#[tokio::test]
async fn selecting_an_unknown_room_is_refused() {
    let mut client = BookingClient::new(StubGateway::new());
    client.sign_in(user()).await;

    assert!(!client.select_room("no-such-room"));
    assert_matches!(client.flow(), BookingFlow::Closed);
}

#[tokio::test]
async fn closing_the_modal_discards_the_draft() {
    let mut client = client_with_open_modal(StubGateway::new()).await;
    client.submit_date(a_date()).await;
    assert!(client.can_book());

    client.close_modal();

    assert_matches!(client.flow(), BookingFlow::Closed);
    assert!(!client.can_book());
    assert_eq!(client.availability(), Availability::Unknown);
}

#[tokio::test]
async fn submitting_a_date_with_no_open_modal_is_ignored() {
    let mut client = BookingClient::new(StubGateway::new());
    client.sign_in(user()).await;

    client.submit_date(a_date()).await;

    assert_matches!(client.flow(), BookingFlow::Closed);
}

// ---------------------------------------------------------------------------
// Price and availability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn price_is_checked_before_availability() {
    let stub = StubGateway::new();
    let calls = Arc::clone(&stub.calls);

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;

    let calls = calls.lock().unwrap();
    assert_eq!(*calls, vec!["get_rooms", "calc_price", "check_availability"]);
}

#[tokio::test]
async fn successful_checks_yield_a_bookable_draft() {
    let mut client = client_with_open_modal(StubGateway::new()).await;
    client.submit_date(a_date()).await;

    assert_matches!(
        client.flow(),
        BookingFlow::Priced { price, availability: Availability::Available, .. } if *price == 60.0
    );
    assert!(client.can_book());
}

#[tokio::test]
async fn price_failure_leaves_availability_unknown_and_never_bookable() {
    let mut stub = StubGateway::new();
    stub.price = None;
    let calls = Arc::clone(&stub.calls);

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;

    assert_matches!(client.flow(), BookingFlow::PriceFailed { message, .. } if message.contains("calc_price"));
    assert_eq!(client.availability(), Availability::Unknown);
    assert!(!client.can_book());

    // The availability check is never even issued after a price failure.
    assert!(!calls.lock().unwrap().contains(&"check_availability"));
}

#[tokio::test]
async fn availability_failure_degrades_to_unknown_without_losing_the_price() {
    let mut stub = StubGateway::new();
    stub.availability = None;

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;

    assert_matches!(
        client.flow(),
        BookingFlow::Priced { price, availability: Availability::Unknown, .. } if *price == 60.0
    );
    assert!(!client.can_book());
}

#[tokio::test]
async fn unavailable_room_is_priced_but_not_bookable() {
    let mut stub = StubGateway::new();
    stub.availability = Some(false);

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;

    assert_eq!(client.availability(), Availability::Unavailable);
    assert!(!client.can_book());
}

#[tokio::test]
async fn resubmitting_a_date_recalculates() {
    let mut client = client_with_open_modal(StubGateway::new()).await;
    client.submit_date(a_date()).await;
    assert!(client.can_book());

    let other_date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
    client.submit_date(other_date).await;

    assert_matches!(client.flow(), BookingFlow::Priced { date, .. } if *date == other_date);
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_booking_forces_unavailability() {
    let mut client = client_with_open_modal(StubGateway::new()).await;
    client.submit_date(a_date()).await;
    client.book().await;

    assert_matches!(client.flow(), BookingFlow::Booked { price, .. } if *price == 60.0);
    assert_eq!(client.availability(), Availability::Unavailable);
    assert!(!client.can_book());
}

#[tokio::test]
async fn failed_booking_surfaces_the_message() {
    let mut stub = StubGateway::new();
    stub.booking_ok = false;

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;
    client.book().await;

    assert_matches!(
        client.flow(),
        BookingFlow::BookingFailed { message, .. } if message.contains("make_booking")
    );
    assert!(!client.can_book());
}

#[tokio::test]
async fn booking_is_refused_without_an_available_draft() {
    let mut stub = StubGateway::new();
    stub.availability = Some(false);
    let calls = Arc::clone(&stub.calls);

    let mut client = client_with_open_modal(stub).await;
    client.submit_date(a_date()).await;
    client.book().await;

    // Still priced-unavailable; no booking call went out.
    assert_matches!(
        client.flow(),
        BookingFlow::Priced { availability: Availability::Unavailable, .. }
    );
    assert!(!calls.lock().unwrap().contains(&"make_booking"));
}
