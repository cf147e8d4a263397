use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bookable studio session (one class, one time slot).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudioSession {
    pub id: String,
    pub title: String,
    pub starts_at: NaiveDateTime,
    pub layout_id: Option<String>,
}
