use serde::{Deserialize, Serialize};

/// Canonical grid-resident seat. One of these exists for every position of a
/// materialized grid; the `row` is always the normalized letter form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub row: String,
    pub column: i32,
    pub status: SeatStatus,
    #[serde(rename = "type")]
    pub kind: SeatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_cost: Option<i32>,
}

impl Seat {
    /// Synthetic seat for a grid position the layout does not define.
    pub fn placeholder(row: &str, column: i32, status: SeatStatus) -> Self {
        Seat {
            id: format!("{}{}", row, column),
            row: row.to_string(),
            column,
            status,
            kind: SeatType::Normal,
            label: None,
            credit_cost: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
    Selected,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Normal,
    Podium,
    Column,
    Instructor,
    Exclusive,
}

impl SeatType {
    /// Only normal and exclusive seats can ever be selected or booked; the
    /// rest are structural fixtures of the floor plan.
    pub fn is_bookable(self) -> bool {
        matches!(self, SeatType::Normal | SeatType::Exclusive)
    }
}
