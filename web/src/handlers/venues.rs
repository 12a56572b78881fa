//! Venue endpoints.
//!
//! Reads are public; create, update and delete require an admin token.

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{Payload, parse_id};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::{Path, State};
use cowork_core::{Venue, VenueFields, VenueId, VenuePatch};

/// `GET /api/v1/venues`
///
/// # Errors
///
/// 500 if the store fails.
pub async fn list_venues(State(state): State<AppState>) -> Result<ApiResponse<Vec<Venue>>, AppError> {
    Ok(ApiResponse::list(state.venues.list().await?))
}

/// `GET /api/v1/venues/:id`
///
/// # Errors
///
/// 404 if the venue does not exist.
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Venue>, AppError> {
    let id: VenueId = parse_id(&id, "venue")?;
    Ok(ApiResponse::ok(state.venues.get(id).await?))
}

/// `POST /api/v1/venues`
///
/// # Errors
///
/// 403 for non-admins, 400 for invalid fields, 409 for a duplicate name.
pub async fn create_venue(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Payload(fields): Payload<VenueFields>,
) -> Result<ApiResponse<Venue>, AppError> {
    Ok(ApiResponse::created(
        state.venues.create(&principal, fields).await?,
    ))
}

/// `PUT /api/v1/venues/:id`
///
/// # Errors
///
/// 403 for non-admins, 404 if missing, 400 or 409 for bad fields.
pub async fn update_venue(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    Payload(patch): Payload<VenuePatch>,
) -> Result<ApiResponse<Venue>, AppError> {
    let id: VenueId = parse_id(&id, "venue")?;
    Ok(ApiResponse::ok(
        state.venues.update(&principal, id, patch).await?,
    ))
}

/// `DELETE /api/v1/venues/:id`
///
/// Also removes every reservation made for the venue.
///
/// # Errors
///
/// 403 for non-admins, 404 if missing.
pub async fn delete_venue(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let id: VenueId = parse_id(&id, "venue")?;
    state.venues.delete(&principal, id).await?;
    Ok(ApiResponse::empty())
}
