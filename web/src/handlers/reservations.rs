//! Reservation endpoints.
//!
//! All routes require a bearer token. Members only ever see and touch their
//! own reservations; admins see and touch all of them.

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{CorrelationId, Payload, parse_id};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::{Path, State};
use cowork_core::{
    Reservation, ReservationFields, ReservationId, ReservationPatch, ReservationView, VenueId,
};

/// `GET /api/v1/reservations`
///
/// # Errors
///
/// 401 without a token.
pub async fn list_reservations(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<ApiResponse<Vec<ReservationView>>, AppError> {
    Ok(ApiResponse::list(
        state.reservations.list(&principal, None).await?,
    ))
}

/// `GET /api/v1/venues/:venue_id/reservations`
///
/// The venue filter applies to admins only.
///
/// # Errors
///
/// 401 without a token, 400 for a malformed venue ID.
pub async fn list_venue_reservations(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(venue_id): Path<String>,
) -> Result<ApiResponse<Vec<ReservationView>>, AppError> {
    let venue_id: VenueId = parse_id(&venue_id, "venue")?;
    Ok(ApiResponse::list(
        state.reservations.list(&principal, Some(venue_id)).await?,
    ))
}

/// `POST /api/v1/venues/:venue_id/reservations`
///
/// # Errors
///
/// 404 for an unknown venue; 400 when over quota, outside opening hours or
/// with start not before end.
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    CorrelationId(correlation_id): CorrelationId,
    Path(venue_id): Path<String>,
    Payload(fields): Payload<ReservationFields>,
) -> Result<ApiResponse<Reservation>, AppError> {
    let venue_id: VenueId = parse_id(&venue_id, "venue")?;
    tracing::debug!(%correlation_id, user_id = %principal.id, %venue_id, "Creating reservation");
    Ok(ApiResponse::created(
        state.reservations.create(&principal, venue_id, fields).await?,
    ))
}

/// `GET /api/v1/reservations/:id`
///
/// # Errors
///
/// 404 if missing, 403 if owned by someone else.
pub async fn get_reservation(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<ReservationView>, AppError> {
    let id: ReservationId = parse_id(&id, "reservation")?;
    Ok(ApiResponse::ok(state.reservations.get(&principal, id).await?))
}

/// `PUT /api/v1/reservations/:id`
///
/// # Errors
///
/// 404 if missing, 403 if owned by someone else.
pub async fn update_reservation(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    Payload(patch): Payload<ReservationPatch>,
) -> Result<ApiResponse<Reservation>, AppError> {
    let id: ReservationId = parse_id(&id, "reservation")?;
    Ok(ApiResponse::ok(
        state.reservations.update(&principal, id, patch).await?,
    ))
}

/// `DELETE /api/v1/reservations/:id`
///
/// # Errors
///
/// 404 if missing, 403 if owned by someone else.
pub async fn delete_reservation(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let id: ReservationId = parse_id(&id, "reservation")?;
    state.reservations.delete(&principal, id).await?;
    Ok(ApiResponse::empty())
}
