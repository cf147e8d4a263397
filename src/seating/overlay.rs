//! Occupancy overlay: merge a session's booking records onto a generated
//! grid. A pure merge — the input list is never mutated and applying the
//! same bookings twice is idempotent.

use std::collections::{HashMap, HashSet};

use crate::models::booking::BookingRecord;
use crate::models::layout::RowId;
use crate::models::seat::{Seat, SeatStatus};

use super::normalize::row_label;

/// What the overlay had to recover from. Anomalies are reported to the
/// caller for logging and aggregate counts; none of them fail a read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OverlayStats {
    /// Records excluded because their session id names another session.
    pub cross_session_skipped: usize,
    /// Records folded in even though they carry no session id at all.
    pub missing_session_id: usize,
    /// Records with no resolvable seat identifier in any shape.
    pub malformed_records: usize,
    /// Booked seat ids that do not exist in the current grid (the layout
    /// changed after the booking was made). Counted, never rendered.
    pub phantom_seat_ids: Vec<String>,
}

impl OverlayStats {
    pub fn is_clean(&self) -> bool {
        self.cross_session_skipped == 0
            && self.missing_session_id == 0
            && self.malformed_records == 0
            && self.phantom_seat_ids.is_empty()
    }
}

/// Overlay `bookings` for `session_id` onto `seats`, forcing every booked
/// seat to `occupied`. Seats outside the occupied set keep their status.
pub fn apply_bookings(seats: &[Seat], bookings: &[BookingRecord], session_id: &str) -> Vec<Seat> {
    apply_bookings_with_stats(seats, bookings, session_id).0
}

/// Same merge, with the recovery stats the read path logs.
pub fn apply_bookings_with_stats(
    seats: &[Seat],
    bookings: &[BookingRecord],
    session_id: &str,
) -> (Vec<Seat>, OverlayStats) {
    let mut stats = OverlayStats::default();

    // Positional fallback lookup for records that only carry row + column.
    let by_position: HashMap<(&str, i32), &str> = seats
        .iter()
        .map(|s| ((s.row.as_str(), s.column), s.id.as_str()))
        .collect();

    let mut occupied: HashSet<&str> = HashSet::new();
    let mut phantoms: Vec<String> = Vec::new();

    for record in bookings {
        match record.session_id.as_deref() {
            // Cross-session leakage guard: an explicit mismatch always excludes.
            Some(sid) if sid != session_id => {
                stats.cross_session_skipped += 1;
                continue;
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    booking_id = %record.id,
                    "booking record without session id folded into overlay"
                );
                stats.missing_session_id += 1;
            }
        }
        if record.is_cancelled() {
            continue;
        }

        let ids = resolve_seat_ids(record, &by_position);
        if ids.is_empty() {
            tracing::warn!(booking_id = %record.id, "booking record has no resolvable seat");
            stats.malformed_records += 1;
            continue;
        }
        for id in ids {
            if by_position.values().any(|known| *known == id) {
                occupied.insert(id);
            } else if !phantoms.iter().any(|p| p == id) {
                phantoms.push(id.to_string());
            }
        }
    }

    let merged = seats
        .iter()
        .map(|seat| {
            if occupied.contains(seat.id.as_str()) {
                let mut seat = seat.clone();
                seat.status = SeatStatus::Occupied;
                seat
            } else {
                seat.clone()
            }
        })
        .collect();

    stats.phantom_seat_ids = phantoms;
    (merged, stats)
}

/// Collect seat identifiers from a record, in order of trust: explicit seat
/// id, embedded seat object, legacy seats list, and finally a positional
/// row/column match against the grid. The first shape that yields anything
/// wins.
fn resolve_seat_ids<'a>(
    record: &'a BookingRecord,
    by_position: &HashMap<(&str, i32), &'a str>,
) -> Vec<&'a str> {
    if let Some(id) = record.seat_id.as_deref() {
        return vec![id];
    }
    if let Some(id) = record.seat.as_ref().and_then(|s| s.resolve()) {
        return vec![id];
    }
    if let Some(entries) = record.seats.as_ref() {
        let ids: Vec<&str> = entries.iter().filter_map(|e| e.resolve()).collect();
        if !ids.is_empty() {
            return ids;
        }
    }
    if let (Some(row), Some(column)) = (record.row.as_ref(), record.column) {
        for candidate in row_candidates(row) {
            if let Some(id) = by_position.get(&(candidate.as_str(), column)) {
                return vec![*id];
            }
        }
    }
    Vec::new()
}

// A positional row may be numeric (1-based index) or already a letter; try
// both readings against the grid.
fn row_candidates(row: &RowId) -> Vec<String> {
    match row {
        RowId::Number(n) if *n >= 1 && *n <= i64::from(i32::MAX) => vec![row_label(*n as i32)],
        RowId::Number(n) => vec![n.to_string()],
        RowId::Text(t) => {
            let mut candidates = Vec::new();
            if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = t.parse::<i32>() {
                    if n >= 1 {
                        candidates.push(row_label(n));
                    }
                }
            }
            candidates.push(t.to_uppercase());
            candidates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{SeatEntry, SeatRef};
    use crate::models::layout::RowId;
    use crate::seating::grid::generate_grid;
    use proptest::prelude::*;

    fn booked(id: &str, session: Option<&str>, seat: Option<&str>) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            session_id: session.map(String::from),
            seat_id: seat.map(String::from),
            ..BookingRecord::default()
        }
    }

    fn status_of<'a>(seats: &'a [Seat], id: &str) -> SeatStatus {
        seats.iter().find(|s| s.id == id).unwrap().status
    }

    #[test]
    fn explicit_seat_id_occupies() {
        let seats = generate_grid(None);
        let merged = apply_bookings(&seats, &[booked("b1", Some("S1"), Some("A3"))], "S1");
        assert_eq!(status_of(&merged, "A3"), SeatStatus::Occupied);
        assert_eq!(status_of(&merged, "A4"), SeatStatus::Available);
    }

    #[test]
    fn cross_session_records_never_occupy() {
        // "S1" booking marks A3; the "S2" record must not touch A4
        let seats = generate_grid(None);
        let bookings = vec![
            booked("b1", Some("S1"), Some("A3")),
            booked("b2", Some("S2"), Some("A4")),
        ];
        let (merged, stats) = apply_bookings_with_stats(&seats, &bookings, "S1");
        assert_eq!(status_of(&merged, "A3"), SeatStatus::Occupied);
        assert_eq!(status_of(&merged, "A4"), SeatStatus::Available);
        assert_eq!(stats.cross_session_skipped, 1);
    }

    #[test]
    fn missing_session_id_is_folded_in_and_counted() {
        let seats = generate_grid(None);
        let (merged, stats) =
            apply_bookings_with_stats(&seats, &[booked("b1", None, Some("B2"))], "S1");
        assert_eq!(status_of(&merged, "B2"), SeatStatus::Occupied);
        assert_eq!(stats.missing_session_id, 1);
    }

    #[test]
    fn embedded_seat_object_resolves() {
        let seats = generate_grid(None);
        let mut record = booked("b1", Some("S1"), None);
        record.seat = Some(SeatRef {
            id: Some("C1".to_string()),
            seat_id: None,
        });
        let merged = apply_bookings(&seats, &[record], "S1");
        assert_eq!(status_of(&merged, "C1"), SeatStatus::Occupied);
    }

    #[test]
    fn seats_list_resolves_every_entry() {
        let seats = generate_grid(None);
        let mut record = booked("b1", Some("S1"), None);
        record.seats = Some(vec![
            SeatEntry::Id("A1".to_string()),
            SeatEntry::Ref(SeatRef {
                id: None,
                seat_id: Some("A2".to_string()),
            }),
        ]);
        let merged = apply_bookings(&seats, &[record], "S1");
        assert_eq!(status_of(&merged, "A1"), SeatStatus::Occupied);
        assert_eq!(status_of(&merged, "A2"), SeatStatus::Occupied);
    }

    #[test]
    fn positional_fallback_matches_numeric_and_letter_rows() {
        let seats = generate_grid(None);

        let mut numeric = booked("b1", Some("S1"), None);
        numeric.row = Some(RowId::Number(2));
        numeric.column = Some(5);

        let mut lettered = booked("b2", Some("S1"), None);
        lettered.row = Some(RowId::Text("c".to_string()));
        lettered.column = Some(1);

        let merged = apply_bookings(&seats, &[numeric, lettered], "S1");
        assert_eq!(status_of(&merged, "B5"), SeatStatus::Occupied);
        assert_eq!(status_of(&merged, "C1"), SeatStatus::Occupied);
    }

    #[test]
    fn malformed_and_phantom_records_are_counted_not_fatal() {
        let seats = generate_grid(None);
        let bookings = vec![
            booked("b1", Some("S1"), None), // no seat reference at all
            booked("b2", Some("S1"), Some("Z9")), // seat gone from the layout
        ];
        let (merged, stats) = apply_bookings_with_stats(&seats, &bookings, "S1");
        assert!(merged.iter().all(|s| s.status == SeatStatus::Available));
        assert_eq!(stats.malformed_records, 1);
        assert_eq!(stats.phantom_seat_ids, vec!["Z9".to_string()]);
    }

    #[test]
    fn cancelled_records_do_not_occupy() {
        let seats = generate_grid(None);
        let mut record = booked("b1", Some("S1"), Some("A1"));
        record.status = Some("cancelled".to_string());
        let merged = apply_bookings(&seats, &[record], "S1");
        assert_eq!(status_of(&merged, "A1"), SeatStatus::Available);
    }

    #[test]
    fn merge_is_pure_and_idempotent() {
        let seats = generate_grid(None);
        let bookings = vec![
            booked("b1", Some("S1"), Some("A3")),
            booked("b2", Some("S2"), Some("A4")),
            booked("b3", None, Some("E10")),
        ];
        let before = seats.clone();
        let once = apply_bookings(&seats, &bookings, "S1");
        let twice = apply_bookings(&once, &bookings, "S1");
        assert_eq!(seats, before);
        assert_eq!(once, twice);
    }

    proptest! {
        // Idempotence and session scoping over arbitrary booking lists:
        // a second application changes nothing, and every occupied seat
        // traces back to a record for the session being rendered.
        #[test]
        fn overlay_is_idempotent_and_session_scoped(
            picks in prop::collection::vec((0usize..50, any::<bool>()), 0..12)
        ) {
            let seats = generate_grid(None);
            let bookings: Vec<BookingRecord> = picks
                .iter()
                .enumerate()
                .map(|(i, (idx, same_session))| BookingRecord {
                    id: format!("b{i}"),
                    session_id: Some(if *same_session { "S1" } else { "S2" }.to_string()),
                    seat_id: Some(seats[*idx].id.clone()),
                    ..BookingRecord::default()
                })
                .collect();

            let once = apply_bookings(&seats, &bookings, "S1");
            let twice = apply_bookings(&once, &bookings, "S1");
            prop_assert_eq!(&once, &twice);

            for seat in &once {
                if seat.status == SeatStatus::Occupied {
                    let has_backing_record = bookings.iter().any(|b| {
                        b.session_id.as_deref() == Some("S1")
                            && b.seat_id.as_deref() == Some(seat.id.as_str())
                    });
                    prop_assert!(has_backing_record);
                }
            }
        }
    }

    #[test]
    fn occupied_wins_over_fallback_available() {
        let seats = generate_grid(None);
        let merged = apply_bookings(&seats, &[booked("b1", Some("S1"), Some("A2"))], "S1");
        assert_eq!(status_of(&merged, "A1"), SeatStatus::Available);
        assert_eq!(status_of(&merged, "A2"), SeatStatus::Occupied);
    }
}
