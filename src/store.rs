//! Booking storage. The write path goes through the `BookingStore` trait so
//! the reconciliation logic can be exercised against an in-memory store; the
//! service itself runs on `PgBookingStore`, where two partial unique indexes
//! (`uq_bookings_member_session`, `uq_bookings_session_seat`) arbitrate
//! concurrent writes.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::booking::{
    Booking, BookingRecord, BookingRow, NewBooking, BOOKING_STATUS_CANCELLED,
    BOOKING_STATUS_CONFIRMED,
};
use crate::models::layout::SeatLayoutDefinition;

/// Which composite uniqueness rule a conflicting write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingConstraint {
    /// One active booking per member per session.
    MemberSession,
    /// One active booking per seat per session.
    SessionSeat,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0:?}")]
    UniqueViolation(BookingConstraint),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub trait BookingStore {
    fn member_exists(
        &self,
        member_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    fn has_active_booking(
        &self,
        member_id: i64,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    fn layout_for_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<SeatLayoutDefinition>, StoreError>> + Send;

    /// All booking records visible for a session, freshly read. Never cache
    /// the result: the write path relies on re-reading immediately before
    /// its availability check.
    fn booking_records_for_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<BookingRecord>, StoreError>> + Send;

    fn insert_booking(
        &self,
        booking: &NewBooking,
    ) -> impl std::future::Future<Output = Result<Booking, StoreError>> + Send;
}

#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BookingStore for PgBookingStore {
    async fn member_exists(&self, member_id: i64) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE member_id = $1)",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn has_active_booking(
        &self,
        member_id: i64,
        session_id: &str,
    ) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
               SELECT 1 FROM bookings
               WHERE member_id = $1 AND session_id = $2 AND status <> $3
             )",
        )
        .bind(member_id)
        .bind(session_id)
        .bind(BOOKING_STATUS_CANCELLED)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn layout_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SeatLayoutDefinition>, StoreError> {
        Ok(load_layout_for_session(&self.pool, session_id).await?)
    }

    async fn booking_records_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let rows = fetch_session_booking_rows(&self.pool, session_id).await?;
        Ok(rows.into_iter().map(BookingRow::into_record).collect())
    }

    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let inserted = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, session_id, member_id, seat_id, status, payment_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, session_id, member_id, seat_id, status, payment_type, created_at",
        )
        .bind(&booking.id)
        .bind(&booking.session_id)
        .bind(booking.member_id)
        .bind(&booking.seat_id)
        .bind(BOOKING_STATUS_CONFIRMED)
        .bind(&booking.payment_type)
        .fetch_one(&self.pool)
        .await
        .map_err(classify_insert_error)?;
        Ok(inserted)
    }
}

fn classify_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        match db.constraint() {
            Some("uq_bookings_member_session") => {
                return StoreError::UniqueViolation(BookingConstraint::MemberSession)
            }
            Some("uq_bookings_session_seat") => {
                return StoreError::UniqueViolation(BookingConstraint::SessionSeat)
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}

/// Layout configured for a session, if any. Layouts are immutable per view,
/// so callers may cache the result.
pub async fn load_layout_for_session(
    pool: &PgPool,
    session_id: &str,
) -> Result<Option<SeatLayoutDefinition>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, i32, i32, bool, serde_json::Value)>(
        "SELECT l.id, l.grid_rows, l.grid_columns, l.is_active, l.seats
         FROM seat_layouts l
         JOIN sessions s ON s.layout_id = l.id
         WHERE s.id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, grid_rows, grid_columns, is_active, seats)| {
        let seats = serde_json::from_value(seats).unwrap_or_else(|e| {
            tracing::warn!(layout_id = %id, "unreadable seat records in layout: {e}");
            Vec::new()
        });
        SeatLayoutDefinition {
            id,
            grid_rows,
            grid_columns,
            is_active,
            seats,
        }
    }))
}

/// Fresh, uncached booking rows for a session. Legacy rows imported from the
/// old portal may have no session id; they are returned too and the overlay
/// decides what to trust.
pub async fn fetch_session_booking_rows(
    pool: &PgPool,
    session_id: &str,
) -> Result<Vec<BookingRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingRow>(
        "SELECT id, session_id, member_id, seat_id, status, details
         FROM bookings
         WHERE (session_id = $1 OR session_id IS NULL)
           AND (status IS NULL OR status <> $2)
         ORDER BY created_at",
    )
    .bind(session_id)
    .bind(BOOKING_STATUS_CANCELLED)
    .fetch_all(pool)
    .await
}
