//! The booking write path. The application-level checks here are a UX fast
//! path only; under concurrency the store's composite unique indexes decide
//! the winner, and a violation maps back onto the same conflict taxonomy.

use uuid::Uuid;

use crate::error::BookingError;
use crate::models::booking::{Booking, NewBooking};
use crate::models::seat::SeatStatus;
use crate::seating::{apply_bookings, generate_grid};
use crate::store::BookingStore;

pub struct BookingService<S> {
    store: S,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a booking for `member_id` on `seat_id` in `session_id`.
    ///
    /// Preconditions, in order: the member exists; the member holds no other
    /// active booking for the session; the seat resolves to `available`
    /// under a freshly recomputed occupancy overlay. All three reads are
    /// stale by the time the insert runs, so the insert itself is the final
    /// arbiter: a unique-index conflict comes back as `AlreadyBooked` or
    /// `SeatTaken`, never as a generic failure.
    pub async fn create_booking(
        &self,
        member_id: i64,
        session_id: &str,
        seat_id: &str,
        payment_type: &str,
    ) -> Result<Booking, BookingError> {
        if !self.store.member_exists(member_id).await? {
            return Err(BookingError::MemberNotFound(member_id));
        }

        if self.store.has_active_booking(member_id, session_id).await? {
            return Err(BookingError::AlreadyBooked);
        }

        // Recompute occupancy from the current booking list; client-held
        // seat state is never trusted at write time.
        let layout = self.store.layout_for_session(session_id).await?;
        let grid = generate_grid(layout.as_ref());
        let records = self.store.booking_records_for_session(session_id).await?;
        let seats = apply_bookings(&grid, &records, session_id);

        match seats.iter().find(|s| s.id == seat_id) {
            Some(seat) if seat.status == SeatStatus::Available && seat.kind.is_bookable() => {}
            Some(seat) => {
                tracing::debug!(%seat_id, status = ?seat.status, "seat not bookable at write time");
                return Err(BookingError::SeatTaken);
            }
            None => {
                tracing::warn!(%seat_id, %session_id, "booking attempt for a seat unknown to the layout");
                return Err(BookingError::SeatTaken);
            }
        }

        let booking = NewBooking {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            member_id,
            seat_id: seat_id.to_string(),
            payment_type: payment_type.to_string(),
        };
        Ok(self.store.insert_booking(&booking).await?)
    }
}
