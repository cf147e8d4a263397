use serde::{Deserialize, Serialize};

/// Seat layout as configured for a studio location. Owned by the location
/// configuration, read-only here. The `seats` list is sparse: only physically
/// defined seats appear, everything else is a hole in the floor plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatLayoutDefinition {
    pub id: String,
    pub grid_rows: i32,
    pub grid_columns: i32,
    #[serde(default = "default_true", alias = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub seats: Vec<SeatRecord>,
}

fn default_true() -> bool {
    true
}

/// One physically defined seat, exactly as the upstream configuration stores
/// it. Row and vocabulary fields are raw and get normalized on grid build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    pub id: String,
    pub row: RowId,
    pub column: i32,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub credit_cost: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Row identifier as it arrives from upstream: either a 1-based number or a
/// letter. Both denote the same axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_accepts_both_shapes() {
        let n: RowId = serde_json::from_str("3").unwrap();
        assert_eq!(n, RowId::Number(3));

        let t: RowId = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(t, RowId::Text("B".to_string()));
    }

    #[test]
    fn layout_defaults_to_active_with_no_seats() {
        let def: SeatLayoutDefinition =
            serde_json::from_str(r#"{"id":"l1","gridRows":2,"gridColumns":4}"#).unwrap();
        assert!(def.is_active);
        assert!(def.seats.is_empty());
    }

    #[test]
    fn seat_record_parses_numeric_row_and_camel_case_fields() {
        let rec: SeatRecord = serde_json::from_str(
            r#"{"id":"s1","row":"1","column":3,"type":"exclusive","creditCost":2}"#,
        )
        .unwrap();
        assert_eq!(rec.row, RowId::Text("1".to_string()));
        assert_eq!(rec.kind.as_deref(), Some("exclusive"));
        assert_eq!(rec.credit_cost, Some(2));
    }
}
