//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation ID
//! - [`Payload`]: JSON body whose rejection renders as an [`AppError`]
//! - [`parse_id`]: path segment to typed ID

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, rejection::JsonRejection},
    http::request::Parts,
};
use std::str::FromStr;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Read from the request extensions when
/// [`correlation_id_layer`](crate::middleware::correlation_id_layer) is
/// installed, otherwise from the `X-Correlation-ID` header, otherwise freshly
/// generated.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// JSON request body.
///
/// Same as [`axum::Json`], but malformed bodies are reported with the
/// standard error envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Parse a path segment into a typed ID.
///
/// # Errors
///
/// Returns a 400 [`AppError`] naming `what` when the segment is not a UUID.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("Invalid {what} id '{raw}'")))
}
