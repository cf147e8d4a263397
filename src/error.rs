use thiserror::Error;

use crate::store::{BookingConstraint, StoreError};

/// Write-path failures surfaced to the caller. Read-path anomalies
/// (malformed or cross-session booking records, missing layouts) are
/// recovered locally and never appear here.
#[derive(Debug, Error)]
pub enum BookingError {
    /// No member record behind the authenticated identity.
    #[error("member {0} not found")]
    MemberNotFound(i64),

    /// The member already holds an active booking for this session.
    #[error("an active booking already exists for this session")]
    AlreadyBooked,

    /// Lost the race for the seat: it is no longer available. The caller
    /// should refresh occupancy and reselect.
    #[error("seat is no longer available")]
    SeatTaken,

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            // The composite unique indexes are the final arbiter; a violation
            // is a lost race, not a generic failure.
            StoreError::UniqueViolation(BookingConstraint::MemberSession) => {
                BookingError::AlreadyBooked
            }
            StoreError::UniqueViolation(BookingConstraint::SessionSeat) => BookingError::SeatTaken,
            other => BookingError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_map_to_their_conflict_kind() {
        let e: BookingError = StoreError::UniqueViolation(BookingConstraint::MemberSession).into();
        assert!(matches!(e, BookingError::AlreadyBooked));

        let e: BookingError = StoreError::UniqueViolation(BookingConstraint::SessionSeat).into();
        assert!(matches!(e, BookingError::SeatTaken));

        let e: BookingError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(e, BookingError::Store(_)));
    }
}
