//! Bearer-token authentication.
//!
//! [`TokenIssuer`] signs and verifies HS256 JWTs. [`AuthUser`] resolves the
//! caller's [`Principal`] from `Authorization: Bearer <token>` and confirms
//! the account still exists, so the role always comes from the stored user.

use crate::error::AppError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use cowork_core::{BookingError, Principal, Role, User, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Role at issue time
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer for an HMAC secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    /// Issue a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns a 500 [`AppError`] if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token for `user` as if it were `now`.
    ///
    /// # Errors
    ///
    /// Returns a 500 [`AppError`] if signing fails.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token")
        })
    }

    /// Verify a token and return its principal.
    ///
    /// # Errors
    ///
    /// Returns a 401 [`AppError`] for a malformed, forged or expired token.
    pub fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::unauthorized(NOT_AUTHORIZED)
        })?;
        let id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized(NOT_AUTHORIZED))?;
        Ok(Principal::new(id, data.claims.role))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(NOT_AUTHORIZED))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(NOT_AUTHORIZED))
}

/// Authenticated caller.
///
/// Use as a handler parameter to require authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claimed = state.tokens.verify(bearer_token(parts)?)?;

        match state.accounts.me(&claimed).await {
            Ok(user) => Ok(Self(user.principal())),
            Err(BookingError::UserNotFound(_)) => Err(AppError::unauthorized(NOT_AUTHORIZED)),
            Err(e) => Err(e.into()),
        }
    }
}
