//! The booking interaction state machine.
//!
//! Replaces the original pile of per-step loading/error/result flags with
//! named states: [`RoomsState`] for the room list and [`BookingFlow`] for
//! the per-modal booking draft. Impossible flag combinations (a bookable
//! room with no price, a booking without an availability check) simply
//! have no representation.
//!
//! Concurrency model: single-task and cooperative. Each gateway call is
//! awaited inline; the only guard is the rooms fetch epoch, which discards
//! a fetch result that resolves after sign-out or after a newer fetch
//! started. That mirrors the original's cancellation flag -- advisory,
//! checked after the await, never a true abort.

use chrono::NaiveDate;

use roomdesk_core::room::{Availability, Room};

use crate::gateway::{BookingGateway, GatewayError};
use crate::session::{Session, UserSession};

/// Where the room list currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomsState {
    /// Nothing fetched (signed out, or never signed in).
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded(Vec<Room>),
    /// The last fetch failed; retried only by a fresh sign-in or an
    /// explicit refresh.
    Failed(String),
}

/// The per-modal booking draft, from selection to outcome.
///
/// Created when a room is selected, discarded when the modal closes.
/// `Booked` and `BookingFailed` are terminal until the modal is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingFlow {
    Closed,
    /// Modal open, waiting for a date.
    DateEntry { room: Room },
    /// Price calculation in flight.
    PricePending { room: Room, date: NaiveDate },
    /// Price calculation failed; no availability was ever established.
    PriceFailed {
        room: Room,
        date: NaiveDate,
        message: String,
    },
    /// Price known; availability is whatever the best-effort check said.
    Priced {
        room: Room,
        date: NaiveDate,
        price: f64,
        availability: Availability,
    },
    /// Booking call in flight.
    BookingPending {
        room: Room,
        date: NaiveDate,
        price: f64,
    },
    /// Booking succeeded; the room is now unavailable on that date.
    Booked {
        room: Room,
        date: NaiveDate,
        price: f64,
    },
    /// Booking failed; message surfaced, price retained.
    BookingFailed {
        room: Room,
        date: NaiveDate,
        price: f64,
        message: String,
    },
}

/// Handle for an in-flight rooms fetch: the epoch it was started under
/// and the token captured at start.
#[derive(Debug, Clone)]
pub struct RoomsFetch {
    pub epoch: u64,
    pub token: String,
}

/// Drives the booking interaction against a [`BookingGateway`].
///
/// Owns the session, the room list, and the modal flow. All methods take
/// `&mut self`; there is no interior locking, matching the original's
/// single-threaded event loop.
pub struct BookingClient<G> {
    gateway: G,
    session: Session,
    rooms: RoomsState,
    flow: BookingFlow,
    fetch_epoch: u64,
}

impl<G: BookingGateway> BookingClient<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            session: Session::Unauthenticated,
            rooms: RoomsState::Idle,
            flow: BookingFlow::Closed,
            fetch_epoch: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn rooms(&self) -> &RoomsState {
        &self.rooms
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    /// The loaded room list, empty unless a fetch has succeeded.
    pub fn loaded_rooms(&self) -> &[Room] {
        match &self.rooms {
            RoomsState::Loaded(rooms) => rooms,
            _ => &[],
        }
    }

    /// Availability of the currently drafted booking.
    ///
    /// A successful booking forces `Unavailable`; anything before a
    /// completed price check is `Unknown`.
    pub fn availability(&self) -> Availability {
        match &self.flow {
            BookingFlow::Priced { availability, .. } => *availability,
            BookingFlow::Booked { .. } => Availability::Unavailable,
            _ => Availability::Unknown,
        }
    }

    /// A booking may only be attempted from a priced, available draft.
    pub fn can_book(&self) -> bool {
        matches!(
            &self.flow,
            BookingFlow::Priced { availability, .. } if availability.is_bookable()
        )
    }

    // -----------------------------------------------------------------------
    // Session transitions
    // -----------------------------------------------------------------------

    /// Apply a session resolution from the identity provider.
    ///
    /// Any transition away from `Authenticated` invalidates in-flight
    /// fetches, clears the room list, and closes the modal.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        if !self.session.is_authenticated() {
            self.fetch_epoch += 1;
            self.rooms = RoomsState::Idle;
            self.flow = BookingFlow::Closed;
        }
    }

    /// Sign in and immediately fetch the room list.
    pub async fn sign_in(&mut self, user: UserSession) {
        self.set_session(Session::Authenticated(user));
        self.refresh_rooms().await;
    }

    pub fn sign_out(&mut self) {
        self.set_session(Session::Unauthenticated);
    }

    // -----------------------------------------------------------------------
    // Rooms fetch
    // -----------------------------------------------------------------------

    /// Start a rooms fetch: bump the epoch, mark the list loading, and
    /// capture the token. Returns `None` when signed out.
    ///
    /// Split from [`complete_rooms_fetch`](Self::complete_rooms_fetch) so
    /// the staleness guard is observable; [`refresh_rooms`](Self::refresh_rooms)
    /// glues the two around the actual network call.
    pub fn begin_rooms_fetch(&mut self) -> Option<RoomsFetch> {
        let token = self.session.id_token()?.to_string();
        self.fetch_epoch += 1;
        self.rooms = RoomsState::Loading;
        Some(RoomsFetch {
            epoch: self.fetch_epoch,
            token,
        })
    }

    /// Apply a rooms fetch result, unless it is stale.
    ///
    /// Stale means the epoch moved on (sign-out, or a newer fetch started)
    /// or authentication flipped away while the fetch was in flight; a
    /// stale result is discarded rather than applied to state it no longer
    /// describes.
    pub fn complete_rooms_fetch(&mut self, epoch: u64, result: Result<Vec<Room>, GatewayError>) {
        if epoch != self.fetch_epoch || !self.session.is_authenticated() {
            tracing::debug!(epoch, current = self.fetch_epoch, "Discarding stale rooms fetch");
            return;
        }
        self.rooms = match result {
            Ok(rooms) => RoomsState::Loaded(rooms),
            Err(e) => RoomsState::Failed(e.to_string()),
        };
    }

    /// Fetch the room list from the booking API.
    pub async fn refresh_rooms(&mut self) {
        let Some(fetch) = self.begin_rooms_fetch() else {
            return;
        };
        let result = self.gateway.get_rooms(&fetch.token).await;
        self.complete_rooms_fetch(fetch.epoch, result);
    }

    // -----------------------------------------------------------------------
    // Booking flow
    // -----------------------------------------------------------------------

    /// Open the booking modal for a loaded room. Returns `false` when the
    /// room is unknown or a draft is already open.
    pub fn select_room(&mut self, room_id: &str) -> bool {
        if !matches!(self.flow, BookingFlow::Closed) {
            return false;
        }
        let Some(room) = self.loaded_rooms().iter().find(|r| r.room_id == room_id) else {
            return false;
        };
        self.flow = BookingFlow::DateEntry { room: room.clone() };
        true
    }

    /// Close the modal (overlay click or Cancel), discarding every
    /// transient booking field.
    pub fn close_modal(&mut self) {
        self.flow = BookingFlow::Closed;
    }

    /// Submit a date for the open draft: calculate the price (required),
    /// then check availability (best-effort).
    ///
    /// The price call always completes before the availability call is
    /// issued. An availability failure degrades to `Unknown` without
    /// disturbing the computed price; a price failure establishes no
    /// availability at all.
    pub async fn submit_date(&mut self, date: NaiveDate) {
        let Some(token) = self.session.id_token().map(str::to_string) else {
            return;
        };
        // Resubmission is allowed from any settled open state.
        let Some(room) = self.resubmittable_room().cloned() else {
            return;
        };

        self.flow = BookingFlow::PricePending {
            room: room.clone(),
            date,
        };

        let price = match self
            .gateway
            .calc_price(&token, date, &room.location_id, &room.room_id)
            .await
        {
            Ok(price) => price,
            Err(e) => {
                self.flow = BookingFlow::PriceFailed {
                    room,
                    date,
                    message: e.to_string(),
                };
                return;
            }
        };

        let availability = match self
            .gateway
            .check_availability(&token, date, &room.room_id)
            .await
        {
            Ok(true) => Availability::Available,
            Ok(false) => Availability::Unavailable,
            Err(e) => {
                tracing::warn!(error = %e, "Availability check failed, degrading to unknown");
                Availability::Unknown
            }
        };

        self.flow = BookingFlow::Priced {
            room,
            date,
            price,
            availability,
        };
    }

    /// Attempt the booking. Only legal from a priced, available draft;
    /// success makes the room unavailable, failure surfaces the message
    /// and is terminal until the modal closes.
    pub async fn book(&mut self) {
        if !self.can_book() {
            return;
        }
        let Some(user) = self.session.user().cloned() else {
            return;
        };
        let BookingFlow::Priced {
            room, date, price, ..
        } = std::mem::replace(&mut self.flow, BookingFlow::Closed)
        else {
            // can_book() already guaranteed the state.
            return;
        };

        self.flow = BookingFlow::BookingPending {
            room: room.clone(),
            date,
            price,
        };

        match self
            .gateway
            .make_booking(&user.id_token, &user.subject, date, &room.room_id)
            .await
        {
            Ok(_) => {
                self.flow = BookingFlow::Booked { room, date, price };
            }
            Err(e) => {
                self.flow = BookingFlow::BookingFailed {
                    room,
                    date,
                    price,
                    message: e.to_string(),
                };
            }
        }
    }

    /// The room of an open draft that accepts a (re)submitted date.
    /// Pending states do not; `Closed` has no room at all.
    fn resubmittable_room(&self) -> Option<&Room> {
        match &self.flow {
            BookingFlow::DateEntry { room }
            | BookingFlow::PriceFailed { room, .. }
            | BookingFlow::Priced { room, .. }
            | BookingFlow::Booked { room, .. }
            | BookingFlow::BookingFailed { room, .. } => Some(room),
            BookingFlow::Closed
            | BookingFlow::PricePending { .. }
            | BookingFlow::BookingPending { .. } => None,
        }
    }
}
