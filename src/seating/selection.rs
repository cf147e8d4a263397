//! Viewer-local seat selection. This state lives with one viewer for one
//! seat map and is never the source of truth for occupancy across viewers;
//! it is kept apart from the canonical seats so a `selected` status can never
//! be persisted by accident.

use crate::models::seat::{Seat, SeatStatus};

/// At most one seat is selected at a time: one seat per member per session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionState {
    selected: Option<String>,
}

/// What a click did. `AuthRequired` is a signal for the auth collaborator,
/// not a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    AuthRequired,
    Selected(String),
    Deselected(String),
    Ignored,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_seat(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Apply a click on `seat`. Occupied and unavailable seats absorb clicks,
    /// as do structural seat types. Selecting a seat drops any previous
    /// selection; clicking the selected seat collapses it back to available.
    pub fn click(&mut self, seat: &Seat, authenticated: bool) -> ClickOutcome {
        if !authenticated {
            return ClickOutcome::AuthRequired;
        }
        if !seat.kind.is_bookable() {
            return ClickOutcome::Ignored;
        }
        let held = self.selected.as_deref() == Some(seat.id.as_str());
        let effective = if held && seat.status == SeatStatus::Available {
            SeatStatus::Selected
        } else {
            seat.status
        };
        match effective {
            SeatStatus::Selected => {
                self.selected = None;
                ClickOutcome::Deselected(seat.id.clone())
            }
            SeatStatus::Available => {
                self.selected = Some(seat.id.clone());
                ClickOutcome::Selected(seat.id.clone())
            }
            // Occupied and unavailable seats absorb the click, even when the
            // viewer still holds a stale selection on them.
            _ => ClickOutcome::Ignored,
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Project the selection onto canonical seats for rendering. Only a seat
    /// the shared store still reports `available` is shown selected; if the
    /// seat was taken by another viewer in the meantime, the occupied status
    /// wins and the stale selection is not rendered.
    pub fn project(&self, seats: &[Seat]) -> Vec<Seat> {
        seats
            .iter()
            .map(|seat| {
                if self.selected.as_deref() == Some(seat.id.as_str())
                    && seat.status == SeatStatus::Available
                {
                    let mut seat = seat.clone();
                    seat.status = SeatStatus::Selected;
                    seat
                } else {
                    seat.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::SeatType;

    fn seat(id: &str, status: SeatStatus, kind: SeatType) -> Seat {
        Seat {
            id: id.to_string(),
            row: "A".to_string(),
            column: 1,
            status,
            kind,
            label: None,
            credit_cost: None,
        }
    }

    #[test]
    fn unauthenticated_click_changes_nothing() {
        let mut state = SelectionState::new();
        let s = seat("A1", SeatStatus::Available, SeatType::Normal);
        assert_eq!(state.click(&s, false), ClickOutcome::AuthRequired);
        assert_eq!(state.selected_seat(), None);
    }

    #[test]
    fn select_then_reselect_keeps_exactly_one() {
        let mut state = SelectionState::new();
        let a = seat("A1", SeatStatus::Available, SeatType::Normal);
        let b = seat("A2", SeatStatus::Available, SeatType::Exclusive);

        assert_eq!(state.click(&a, true), ClickOutcome::Selected("A1".into()));
        assert_eq!(state.click(&b, true), ClickOutcome::Selected("A2".into()));
        assert_eq!(state.selected_seat(), Some("A2"));

        let projected = state.project(&[a, b]);
        let selected: Vec<&str> = projected
            .iter()
            .filter(|s| s.status == SeatStatus::Selected)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(selected, vec!["A2"]);
    }

    #[test]
    fn clicking_selected_seat_deselects() {
        let mut state = SelectionState::new();
        let a = seat("A1", SeatStatus::Available, SeatType::Normal);
        state.click(&a, true);
        assert_eq!(state.click(&a, true), ClickOutcome::Deselected("A1".into()));
        assert_eq!(state.selected_seat(), None);
    }

    #[test]
    fn occupied_and_unavailable_absorb_clicks() {
        let mut state = SelectionState::new();
        let occupied = seat("A1", SeatStatus::Occupied, SeatType::Normal);
        let hole = seat("A2", SeatStatus::Unavailable, SeatType::Normal);
        assert_eq!(state.click(&occupied, true), ClickOutcome::Ignored);
        assert_eq!(state.click(&hole, true), ClickOutcome::Ignored);
        assert_eq!(state.selected_seat(), None);
    }

    #[test]
    fn structural_seats_are_never_clickable() {
        let mut state = SelectionState::new();
        for kind in [SeatType::Podium, SeatType::Column, SeatType::Instructor] {
            let s = seat("A1", SeatStatus::Available, kind);
            assert_eq!(state.click(&s, true), ClickOutcome::Ignored);
        }
    }

    #[test]
    fn stale_selection_loses_to_occupancy() {
        let mut state = SelectionState::new();
        let a = seat("A1", SeatStatus::Available, SeatType::Normal);
        state.click(&a, true);

        // Another viewer booked A1; the refreshed overlay reports it occupied
        let refreshed = vec![seat("A1", SeatStatus::Occupied, SeatType::Normal)];
        let projected = state.project(&refreshed);
        assert_eq!(projected[0].status, SeatStatus::Occupied);
    }
}
