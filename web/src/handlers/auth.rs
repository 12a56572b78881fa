//! Account endpoints.
//!
//! - `POST /api/v1/auth/register` - create an account, returns a token
//! - `POST /api/v1/auth/login` - exchange credentials for a token
//! - `GET /api/v1/auth/me` - the current user

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::Payload;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cowork_core::{NewUser, User};
use serde::{Deserialize, Serialize};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Response carrying a freshly issued token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    success: bool,
    token: String,
    data: User,
    #[serde(skip)]
    status: StatusCode,
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Register a new account.
///
/// # Errors
///
/// 400 for invalid input, 409 if the email is taken.
pub async fn register(
    State(state): State<AppState>,
    Payload(request): Payload<NewUser>,
) -> Result<TokenResponse, AppError> {
    let user = state.accounts.register(request).await?;
    let token = state.tokens.issue(&user)?;
    Ok(TokenResponse {
        success: true,
        token,
        data: user,
        status: StatusCode::CREATED,
    })
}

/// Log in with email and password.
///
/// # Errors
///
/// 400 when either field is empty, 401 for bad credentials.
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> Result<TokenResponse, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::bad_request("Please provide an email and password"));
    }
    let user = state.accounts.login(&request.email, &request.password).await?;
    let token = state.tokens.issue(&user)?;
    Ok(TokenResponse {
        success: true,
        token,
        data: user,
        status: StatusCode::OK,
    })
}

/// The authenticated user.
///
/// # Errors
///
/// 401 without a valid token.
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<ApiResponse<User>, AppError> {
    Ok(ApiResponse::ok(state.accounts.me(&principal).await?))
}
