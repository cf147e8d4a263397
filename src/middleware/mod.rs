use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::models::Member;

/// The authenticated member behind a request. Authentication itself belongs
/// to the auth collaborator; this extractor is the boundary where its
/// identity becomes a member row.
#[derive(Debug, Clone)]
pub struct AuthMember {
    pub member_id: i64,
    pub email: String,
    pub first_name: String,
    pub surname: String,
}

// Basic Auth extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthMember {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let encoded = auth_header
            .strip_prefix("Basic ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let decoded = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

        // email:password
        let mut parts = credentials.splitn(2, ':');
        let email = parts.next().ok_or(StatusCode::UNAUTHORIZED)?;
        let password = parts.next().ok_or(StatusCode::UNAUTHORIZED)?;

        let member = Member::find_by_email(email, &state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if !member.is_active || !member.verify_password(password) {
            return Err(StatusCode::UNAUTHORIZED);
        }

        sqlx::query("UPDATE members SET last_logged_in = NOW() WHERE member_id = $1")
            .bind(member.member_id)
            .execute(&state.db.pool)
            .await
            .ok(); // login bookkeeping must not fail the request

        Ok(AuthMember {
            member_id: member.member_id,
            email: member.email,
            first_name: member.first_name,
            surname: member.surname,
        })
    }
}
