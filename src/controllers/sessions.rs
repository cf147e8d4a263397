use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{Seat, SeatStatus, StudioSession};
use crate::seating::{apply_bookings_with_stats, generate_grid};
use crate::store::fetch_session_booking_rows;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}/seats", get(session_seats))
}

/* ---------- SESSIONS ---------- */

#[derive(Debug, Deserialize)]
struct SessionsQuery {
    date: Option<String>,
    page: Option<u32>,
    #[serde(rename = "pageSize")]
    page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    id: String,
    title: String,
    starts_at: NaiveDateTime,
}

// GET /api/sessions
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 50);
    let offset = (page - 1) * page_size;

    let from = match params.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| (StatusCode::BAD_REQUEST, "date must be YYYY-MM-DD".to_string()))?
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default(),
        ),
        None => None,
    };

    let mut q =
        String::from("SELECT id, title, starts_at, layout_id FROM sessions WHERE starts_at > NOW()");
    if from.is_some() {
        q.push_str(" AND starts_at >= $1 ORDER BY starts_at LIMIT $2 OFFSET $3");
    } else {
        q.push_str(" ORDER BY starts_at LIMIT $1 OFFSET $2");
    }

    let mut dbq = sqlx::query_as::<_, StudioSession>(&q);
    if let Some(from) = from {
        dbq = dbq.bind(from);
    }

    let rows = dbq
        .bind(i64::from(page_size))
        .bind(i64::from(offset))
        .fetch_all(&state.db.pool)
        .await
        .map_err(|e| {
            tracing::error!("list_sessions sql error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list sessions".to_string(),
            )
        })?;

    let payload: Vec<SessionResponse> = rows
        .into_iter()
        .map(|s| SessionResponse {
            id: s.id,
            title: s.title,
            starts_at: s.starts_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}

/* ---------- SEAT MAP ---------- */

#[derive(Debug, Serialize)]
struct SeatMapResponse {
    session_id: String,
    seats: Vec<Seat>,
    counts: OccupancyCounts,
}

/// Aggregate occupancy, including bookings whose seat no longer exists in
/// the layout — those occupy no rendered seat but still count.
#[derive(Debug, Serialize)]
struct OccupancyCounts {
    total: usize,
    available: usize,
    occupied: usize,
    unavailable: usize,
    phantom_bookings: usize,
}

// GET /api/sessions/{id}/seats
async fn session_seats(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(&session_id)
            .fetch_one(&state.db.pool)
            .await
            .map_err(|e| {
                tracing::error!("session lookup sql error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load session".to_string(),
                )
            })?;
    if !session_exists {
        return Err((StatusCode::NOT_FOUND, "Session not found".to_string()));
    }

    // The layout is cacheable; the booking list is read fresh every time.
    let (layout, booking_rows) = futures::try_join!(
        state.cache.layout_for_session(&session_id),
        fetch_session_booking_rows(&state.db.pool, &session_id),
    )
    .map_err(|e| {
        tracing::error!("seat map load error for session {}: {:?}", session_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load seat map".to_string(),
        )
    })?;

    if layout.is_none() {
        // Recovered locally with the fallback grid, never a user-facing error
        tracing::info!(%session_id, "no active layout configured, using fallback grid");
    }

    let grid = generate_grid(layout.as_ref());
    let records: Vec<_> = booking_rows
        .into_iter()
        .map(crate::models::BookingRow::into_record)
        .collect();
    let (seats, stats) = apply_bookings_with_stats(&grid, &records, &session_id);

    if !stats.is_clean() {
        tracing::warn!(
            %session_id,
            cross_session = stats.cross_session_skipped,
            missing_session = stats.missing_session_id,
            malformed = stats.malformed_records,
            phantom = stats.phantom_seat_ids.len(),
            "overlay recovered from inconsistent booking records"
        );
    }

    let counts = OccupancyCounts {
        total: seats.len(),
        available: count(&seats, SeatStatus::Available),
        occupied: count(&seats, SeatStatus::Occupied),
        unavailable: count(&seats, SeatStatus::Unavailable),
        phantom_bookings: stats.phantom_seat_ids.len(),
    };

    Ok((
        StatusCode::OK,
        Json(SeatMapResponse {
            session_id,
            seats,
            counts,
        }),
    ))
}

fn count(seats: &[Seat], status: SeatStatus) -> usize {
    seats.iter().filter(|s| s.status == status).count()
}
