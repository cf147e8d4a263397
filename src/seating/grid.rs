//! Grid generation: materialize a complete rows×columns seat grid from a
//! sparse layout definition.

use std::collections::{HashMap, HashSet};

use crate::models::layout::{SeatLayoutDefinition, SeatRecord};
use crate::models::seat::{Seat, SeatStatus};

use super::normalize::{normalize_row, normalize_seat_status, normalize_seat_type, row_label};

/// Fallback grid used when no active layout is configured for a session.
/// Every cell is a generically bookable normal seat, so booking can proceed
/// without a real floor plan.
pub const FALLBACK_GRID_ROWS: i32 = 5;
pub const FALLBACK_GRID_COLUMNS: i32 = 10;

/// Build the full seat grid for a layout definition.
///
/// With no definition, or an inactive one, the 5×10 fallback grid is
/// produced and every cell is `available`. With a real layout, every
/// position in `[1..grid_rows] × [1..grid_columns]` yields exactly one seat;
/// positions without a seat record become `unavailable` placeholders (holes
/// in the floor plan, e.g. aisles). Output order is row-major and stable:
/// ascending row, then ascending column.
///
/// Seat records whose normalized position falls outside the declared bounds
/// are appended after the grid rather than dropped, deduplicated by id and
/// by position.
pub fn generate_grid(def: Option<&SeatLayoutDefinition>) -> Vec<Seat> {
    let def = match def {
        Some(d) if d.is_active => d,
        _ => return fallback_grid(),
    };

    let rows = def.grid_rows.max(0);
    let columns = def.grid_columns.max(0);

    // Last record wins when a layout defines the same position twice.
    let mut by_position: HashMap<(String, i32), &SeatRecord> = HashMap::new();
    for record in &def.seats {
        let row = normalize_row(&record.row, rows);
        by_position.insert((row, record.column), record);
    }

    let mut seats = Vec::with_capacity((rows * columns) as usize);
    for r in 1..=rows {
        let row = row_label(r);
        for column in 1..=columns {
            match by_position.get(&(row.clone(), column)) {
                Some(record) => seats.push(seat_from_record(record, &row, column)),
                None => seats.push(Seat::placeholder(&row, column, SeatStatus::Unavailable)),
            }
        }
    }

    append_out_of_bounds(&mut seats, def, rows, columns);
    seats
}

fn fallback_grid() -> Vec<Seat> {
    let mut seats = Vec::with_capacity((FALLBACK_GRID_ROWS * FALLBACK_GRID_COLUMNS) as usize);
    for r in 1..=FALLBACK_GRID_ROWS {
        let row = row_label(r);
        for column in 1..=FALLBACK_GRID_COLUMNS {
            seats.push(Seat::placeholder(&row, column, SeatStatus::Available));
        }
    }
    seats
}

fn seat_from_record(record: &SeatRecord, row: &str, column: i32) -> Seat {
    Seat {
        id: record.id.clone(),
        row: row.to_string(),
        column,
        status: normalize_seat_status(record.status.as_deref()),
        kind: normalize_seat_type(record.kind.as_deref()),
        label: record.label.clone(),
        credit_cost: record.credit_cost,
    }
}

// Malformed layouts sometimes carry records outside the declared grid; they
// are kept visible instead of silently vanishing from the seat map.
fn append_out_of_bounds(seats: &mut Vec<Seat>, def: &SeatLayoutDefinition, rows: i32, columns: i32) {
    let mut seen_ids: HashSet<String> = seats.iter().map(|s| s.id.clone()).collect();
    let mut seen_positions: HashSet<(String, i32)> =
        seats.iter().map(|s| (s.row.clone(), s.column)).collect();

    for record in &def.seats {
        let row = normalize_row(&record.row, rows);
        let in_bounds = record.column >= 1
            && record.column <= columns
            && (1..=rows).any(|r| row_label(r) == row);
        if in_bounds {
            continue;
        }
        if !seen_ids.insert(record.id.clone()) {
            continue;
        }
        if !seen_positions.insert((row.clone(), record.column)) {
            continue;
        }
        seats.push(seat_from_record(record, &row, record.column));
    }
}
