//! HTTP gateway to the external booking API.
//!
//! [`BookingGateway`] is the seam the state machine drives; [`BookingApi`]
//! is the reqwest-backed implementation. The API's response shapes are
//! loose (a price may arrive bare or wrapped, availability may be a bare
//! boolean or a boolean-like field), so normalization lives here.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde_json::Value;

use roomdesk_core::room::Room;

/// Errors from the booking API, surfaced to the flow as message strings.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Malformed(String),
}

/// The four booking API operations the client drives.
///
/// Every call carries the bearer token; `make_booking` additionally sends
/// the user id. Implemented by [`BookingApi`] in production and by stubs
/// in tests.
#[async_trait]
pub trait BookingGateway {
    async fn get_rooms(&self, token: &str) -> Result<Vec<Room>, GatewayError>;

    async fn calc_price(
        &self,
        token: &str,
        date: NaiveDate,
        location_id: &str,
        room_id: &str,
    ) -> Result<f64, GatewayError>;

    async fn check_availability(
        &self,
        token: &str,
        date: NaiveDate,
        room_id: &str,
    ) -> Result<bool, GatewayError>;

    async fn make_booking(
        &self,
        token: &str,
        user_id: &str,
        date: NaiveDate,
        room_id: &str,
    ) -> Result<Value, GatewayError>;
}

/// Reqwest-backed booking API client.
pub struct BookingApi {
    http: reqwest::Client,
    base_url: Url,
}

impl BookingApi {
    /// Create a client for a booking API at `base_url`
    /// (e.g. `http://localhost:8000`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/booking/{name}"));
        url
    }
}

#[async_trait]
impl BookingGateway for BookingApi {
    async fn get_rooms(&self, token: &str) -> Result<Vec<Room>, GatewayError> {
        let body: Value = self
            .http
            .get(self.endpoint("getrooms"))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        normalize_rooms(body)
    }

    async fn calc_price(
        &self,
        token: &str,
        date: NaiveDate,
        location_id: &str,
        room_id: &str,
    ) -> Result<f64, GatewayError> {
        let body: Value = self
            .http
            .get(self.endpoint("calcprice"))
            .query(&[
                ("date", date.to_string().as_str()),
                ("location_id", location_id),
                ("room_id", room_id),
            ])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_price(&body)
    }

    async fn check_availability(
        &self,
        token: &str,
        date: NaiveDate,
        room_id: &str,
    ) -> Result<bool, GatewayError> {
        let body: Value = self
            .http
            .get(self.endpoint("checkbooking"))
            .query(&[
                ("date", date.to_string().as_str()),
                ("room_id", room_id),
            ])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_availability(&body))
    }

    async fn make_booking(
        &self,
        token: &str,
        user_id: &str,
        date: NaiveDate,
        room_id: &str,
    ) -> Result<Value, GatewayError> {
        let body: Value = self
            .http
            .post(self.endpoint("makebooking"))
            .query(&[
                ("date", date.to_string().as_str()),
                ("room_id", room_id),
            ])
            .bearer_auth(token)
            .header("x-user-id", user_id)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}

/// Normalize the rooms payload: an array deserializes element-wise, any
/// other shape is an empty list.
fn normalize_rooms(body: Value) -> Result<Vec<Room>, GatewayError> {
    match body {
        Value::Array(_) => {
            serde_json::from_value(body).map_err(|e| GatewayError::Malformed(e.to_string()))
        }
        _ => Ok(Vec::new()),
    }
}

/// Accept `{"adjustedPrice": n}` or a bare numeric body.
fn parse_price(body: &Value) -> Result<f64, GatewayError> {
    let candidate = body.get("adjustedPrice").unwrap_or(body);
    match candidate {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| GatewayError::Malformed(format!("price out of range: {n}"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| GatewayError::Malformed(format!("non-numeric price: {s:?}"))),
        other => Err(GatewayError::Malformed(format!(
            "expected a price, got: {other}"
        ))),
    }
}

/// Accept a bare boolean, or an object whose `available` field is a
/// boolean (or failing that, truthy).
fn parse_availability(body: &Value) -> bool {
    match body {
        Value::Bool(b) => *b,
        Value::Object(map) => match map.get("available") {
            Some(Value::Bool(b)) => *b,
            Some(v) => is_truthy(v),
            None => false,
        },
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
