//! Canonicalization of the heterogeneous row/type/status vocabularies coming
//! from upstream layout and booking data. Pure functions, no side effects;
//! unknown inputs degrade to the most permissive default instead of erroring.

use crate::models::layout::RowId;
use crate::models::seat::{SeatStatus, SeatType};

/// Map a 1-based row index onto its letter label: 1 -> "A", 26 -> "Z",
/// 27 -> "AA". Spreadsheet-style so the mapping stays a bijection for any
/// grid height.
pub fn row_label(n: i32) -> String {
    debug_assert!(n >= 1);
    let mut n = n;
    let mut label = String::new();
    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    label
}

/// Canonicalize a row identifier. A purely numeric value in `[1, grid_rows]`
/// maps onto its letter label; anything else is upper-cased and returned
/// unchanged.
pub fn normalize_row(raw: &RowId, grid_rows: i32) -> String {
    match raw {
        RowId::Number(n) => numeric_row(*n, grid_rows),
        RowId::Text(t) => {
            if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) {
                match t.parse::<i64>() {
                    Ok(n) => numeric_row(n, grid_rows),
                    Err(_) => t.to_uppercase(),
                }
            } else {
                t.to_uppercase()
            }
        }
    }
}

fn numeric_row(n: i64, grid_rows: i32) -> String {
    if n >= 1 && n <= i64::from(grid_rows) {
        row_label(n as i32)
    } else {
        n.to_string()
    }
}

/// Case-insensitive match against the closed seat-type set, `normal` on miss.
pub fn normalize_seat_type(raw: Option<&str>) -> SeatType {
    match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("podium") => SeatType::Podium,
        Some("column") => SeatType::Column,
        Some("instructor") => SeatType::Instructor,
        Some("exclusive") => SeatType::Exclusive,
        _ => SeatType::Normal,
    }
}

/// Case-insensitive status vocabulary match, `available` on miss.
pub fn normalize_seat_status(raw: Option<&str>) -> SeatStatus {
    match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("active") | Some("available") => SeatStatus::Available,
        Some("inactive") | Some("occupied") => SeatStatus::Occupied,
        Some("selected") => SeatStatus::Selected,
        Some("unavailable") => SeatStatus::Unavailable,
        _ => SeatStatus::Available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_rows_map_to_letters() {
        assert_eq!(normalize_row(&RowId::Number(1), 5), "A");
        assert_eq!(normalize_row(&RowId::Number(5), 5), "E");
        assert_eq!(normalize_row(&RowId::Text("1".to_string()), 5), "A");
        assert_eq!(normalize_row(&RowId::Text("3".to_string()), 5), "C");
    }

    #[test]
    fn out_of_range_numbers_pass_through() {
        assert_eq!(normalize_row(&RowId::Number(0), 5), "0");
        assert_eq!(normalize_row(&RowId::Number(6), 5), "6");
        assert_eq!(normalize_row(&RowId::Text("12".to_string()), 5), "12");
    }

    #[test]
    fn letters_are_upper_cased_identity() {
        assert_eq!(normalize_row(&RowId::Text("a".to_string()), 5), "A");
        assert_eq!(normalize_row(&RowId::Text("AA".to_string()), 5), "AA");
        // Mixed content is not "purely numeric"
        assert_eq!(normalize_row(&RowId::Text("1b".to_string()), 5), "1B");
    }

    #[test]
    fn row_labels_extend_past_z() {
        assert_eq!(row_label(26), "Z");
        assert_eq!(row_label(27), "AA");
        assert_eq!(row_label(52), "AZ");
    }

    #[test]
    fn seat_type_vocabulary() {
        assert_eq!(normalize_seat_type(Some("Exclusive")), SeatType::Exclusive);
        assert_eq!(normalize_seat_type(Some("PODIUM")), SeatType::Podium);
        assert_eq!(normalize_seat_type(Some("beanbag")), SeatType::Normal);
        assert_eq!(normalize_seat_type(None), SeatType::Normal);
    }

    #[test]
    fn seat_status_vocabulary() {
        assert_eq!(normalize_seat_status(Some("active")), SeatStatus::Available);
        assert_eq!(normalize_seat_status(Some("inactive")), SeatStatus::Occupied);
        assert_eq!(normalize_seat_status(Some("OCCUPIED")), SeatStatus::Occupied);
        assert_eq!(normalize_seat_status(Some("selected")), SeatStatus::Selected);
        assert_eq!(
            normalize_seat_status(Some("unavailable")),
            SeatStatus::Unavailable
        );
        assert_eq!(normalize_seat_status(Some("???")), SeatStatus::Available);
        assert_eq!(normalize_seat_status(None), SeatStatus::Available);
    }

    proptest! {
        // Numeric inputs form a bijection with the first grid_rows labels.
        #[test]
        fn numeric_row_bijection(grid_rows in 1i32..60) {
            let mut seen = std::collections::HashSet::new();
            for n in 1..=grid_rows {
                let label = normalize_row(&RowId::Number(i64::from(n)), grid_rows);
                prop_assert_eq!(&label, &row_label(n));
                prop_assert!(seen.insert(label));
            }
            prop_assert_eq!(seen.len(), grid_rows as usize);
        }

        // Letter inputs are the up-cased identity regardless of grid size.
        #[test]
        fn letter_rows_identity(s in "[a-zA-Z]{1,3}", grid_rows in 1i32..60) {
            let label = normalize_row(&RowId::Text(s.clone()), grid_rows);
            prop_assert_eq!(label, s.to_uppercase());
        }
    }
}
