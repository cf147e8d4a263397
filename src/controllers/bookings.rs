use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::BookingError;
use crate::middleware::AuthMember;
use crate::models::booking::BOOKING_STATUS_CANCELLED;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings", get(get_member_bookings))
        .route("/bookings/cancel", patch(cancel_booking))
}

/* ---------- helpers ---------- */

fn status_419() -> StatusCode {
    StatusCode::from_u16(419).unwrap_or(StatusCode::CONFLICT)
}

// The two conflict kinds stay distinguishable so the UI can re-offer seat
// selection instead of a generic failure.
fn booking_error_response(err: BookingError) -> (StatusCode, String) {
    match err {
        BookingError::AlreadyBooked => (
            StatusCode::CONFLICT,
            "You already have an active booking for this session".to_string(),
        ),
        BookingError::SeatTaken => (
            status_419(),
            "That seat was just taken, refresh the seat map and pick another".to_string(),
        ),
        BookingError::MemberNotFound(_) => (
            StatusCode::NOT_FOUND,
            "No member record for this account".to_string(),
        ),
        BookingError::Store(e) => {
            tracing::error!("booking store error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create booking".to_string(),
            )
        }
    }
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
struct CreateBookingRequest {
    #[validate(length(min = 1))]
    pub session_id: String,
    #[validate(length(min = 1))]
    pub seat_id: String,
    /// Already authorized by the credits/payments collaborator; recorded
    /// verbatim.
    #[validate(length(min = 1))]
    pub payment_type: String,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    member: AuthMember,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let booking = state
        .bookings
        .create_booking(member.member_id, &req.session_id, &req.seat_id, &req.payment_type)
        .await
        .map_err(booking_error_response)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
#[derive(Debug, Serialize)]
struct BookingResponse {
    id: String,
    session_id: Option<String>,
    session_title: Option<String>,
    seat_id: Option<String>,
    status: Option<String>,
    payment_type: Option<String>,
    created_at: NaiveDateTime,
}

async fn get_member_bookings(
    State(state): State<Arc<AppState>>,
    member: AuthMember,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            NaiveDateTime,
        ),
    >(
        "SELECT b.id, b.session_id, s.title, b.seat_id, b.status, b.payment_type, b.created_at
         FROM bookings b
         LEFT JOIN sessions s ON s.id = b.session_id
         WHERE b.member_id = $1
         ORDER BY b.created_at DESC",
    )
    .bind(member.member_id)
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("get_member_bookings sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to list bookings".to_string(),
        )
    })?;

    let payload: Vec<BookingResponse> = rows
        .into_iter()
        .map(
            |(id, session_id, session_title, seat_id, status, payment_type, created_at)| {
                BookingResponse {
                    id,
                    session_id,
                    session_title,
                    seat_id,
                    status,
                    payment_type,
                    created_at,
                }
            },
        )
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}

// PATCH /api/bookings/cancel
#[derive(Debug, Deserialize, Validate)]
struct CancelBookingRequest {
    #[validate(length(min = 1))]
    pub booking_id: String,
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    member: AuthMember,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // Cancelling releases both uniqueness slots (member+session, seat+session)
    let cancelled = sqlx::query(
        "UPDATE bookings SET status = $1
         WHERE id = $2 AND member_id = $3 AND status <> $1",
    )
    .bind(BOOKING_STATUS_CANCELLED)
    .bind(&req.booking_id)
    .bind(member.member_id)
    .execute(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("cancel_booking sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to cancel booking".to_string(),
        )
    })?
    .rows_affected()
        > 0;

    if cancelled {
        Ok((
            StatusCode::OK,
            Json(serde_json::json!({"message": "Booking cancelled"})),
        ))
    } else {
        Err((
            status_419(),
            "Booking not found, not yours, or already cancelled".to_string(),
        ))
    }
}
