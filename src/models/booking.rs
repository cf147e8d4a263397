use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const BOOKING_STATUS_CONFIRMED: &str = "confirmed";
pub const BOOKING_STATUS_CANCELLED: &str = "cancelled";

/// A booking as persisted by the write path.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub session_id: String,
    pub member_id: i64,
    pub seat_id: String,
    pub status: String,
    pub payment_type: String,
    pub created_at: NaiveDateTime,
}

/// Insert payload for the booking writer.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: String,
    pub session_id: String,
    pub member_id: i64,
    pub seat_id: String,
    pub payment_type: String,
}

/// Raw bookings row. First-class columns cover rows written by this service;
/// `details` carries the JSON payload imported from the legacy portal, where
/// the seat reference can live under several historical shapes.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: String,
    pub session_id: Option<String>,
    pub member_id: Option<i64>,
    pub seat_id: Option<String>,
    pub status: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl BookingRow {
    /// Fold the row into one overlay input. Explicit columns win over
    /// whatever the legacy details blob says.
    pub fn into_record(self) -> BookingRecord {
        let mut rec = match self.details {
            Some(value) => serde_json::from_value::<BookingRecord>(value).unwrap_or_else(|e| {
                tracing::warn!(booking_id = %self.id, "unreadable legacy booking details: {e}");
                BookingRecord::default()
            }),
            None => BookingRecord::default(),
        };
        rec.id = self.id;
        if self.session_id.is_some() {
            rec.session_id = self.session_id;
        }
        if self.member_id.is_some() {
            rec.member_id = self.member_id;
        }
        if self.seat_id.is_some() {
            rec.seat_id = self.seat_id;
        }
        if self.status.is_some() {
            rec.status = self.status;
        }
        rec
    }
}

/// A booking record as the overlay consumes it. Every field except `id` is
/// optional because records arrive in multiple historical shapes: an explicit
/// seat id, an embedded seat object, a list of seat references, or a bare
/// row/column pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRecord {
    pub id: String,
    #[serde(alias = "session_id")]
    pub session_id: Option<String>,
    #[serde(alias = "member_id")]
    pub member_id: Option<i64>,
    #[serde(alias = "seat_id")]
    pub seat_id: Option<String>,
    pub seat: Option<SeatRef>,
    pub seats: Option<Vec<SeatEntry>>,
    pub row: Option<super::layout::RowId>,
    pub column: Option<i32>,
    pub status: Option<String>,
}

impl BookingRecord {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some(BOOKING_STATUS_CANCELLED)
    }
}

/// Embedded seat object, `{ "id": ... }` or `{ "seatId": ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatRef {
    pub id: Option<String>,
    #[serde(alias = "seat_id")]
    pub seat_id: Option<String>,
}

impl SeatRef {
    pub fn resolve(&self) -> Option<&str> {
        self.id.as_deref().or(self.seat_id.as_deref())
    }
}

/// Entry of a legacy `seats` list: a string literal or a seat object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeatEntry {
    Id(String),
    Ref(SeatRef),
}

impl SeatEntry {
    pub fn resolve(&self) -> Option<&str> {
        match self {
            SeatEntry::Id(id) => Some(id.as_str()),
            SeatEntry::Ref(seat) => seat.resolve(),
        }
    }
}
