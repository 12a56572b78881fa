//! Error types for booking operations.

use crate::types::{ReservationId, Role, UserId, VenueId, hhmm};
use chrono::NaiveTime;
use std::fmt;
use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Which edge of a venue's opening hours a reservation crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursViolation {
    /// The reservation starts before the venue opens.
    StartsBeforeOpen {
        /// Requested start
        start: NaiveTime,
        /// Venue opening time
        open: NaiveTime,
    },
    /// The reservation ends after the venue closes.
    EndsAfterClose {
        /// Requested end
        end: NaiveTime,
        /// Venue closing time
        close: NaiveTime,
    },
}

impl fmt::Display for HoursViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartsBeforeOpen { open, .. } => {
                write!(f, "startTime earlier than open time {}", hhmm::format(open))
            }
            Self::EndsAfterClose { close, .. } => {
                write!(f, "endTime later than close time {}", hhmm::format(close))
            }
        }
    }
}

/// Every way a booking operation can fail.
///
/// Grouped the way the HTTP layer reports them: missing resources,
/// authorization failures, business-rule rejections, input problems and
/// storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    // ═══════════════════════════════════════════════════════════
    // Missing resources
    // ═══════════════════════════════════════════════════════════

    /// Venue does not exist.
    #[error("No venue with the id of {0}")]
    VenueNotFound(VenueId),

    /// Reservation does not exist.
    #[error("No reservation with the id of {0}")]
    ReservationNotFound(ReservationId),

    /// User does not exist.
    #[error("No user with the id of {0}")]
    UserNotFound(UserId),

    // ═══════════════════════════════════════════════════════════
    // Authorization
    // ═══════════════════════════════════════════════════════════

    /// Caller neither owns the resource nor is an admin.
    #[error("User {user} is not authorized to access this reservation")]
    Forbidden {
        /// The rejected caller
        user: UserId,
    },

    /// Route is restricted to admins.
    #[error("User role {role} is not authorized to access this route")]
    AdminRequired {
        /// The caller's actual role
        role: Role,
    },

    /// Email/password pair did not match an account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ═══════════════════════════════════════════════════════════
    // Admission rules
    // ═══════════════════════════════════════════════════════════

    /// Non-admin user already holds the maximum number of reservations.
    #[error("The user with ID {user} has already made {limit} reservations")]
    QuotaExceeded {
        /// The user at quota
        user: UserId,
        /// Configured quota
        limit: usize,
    },

    /// Reservation window falls outside the venue's opening hours.
    #[error("{0}")]
    OutOfHours(HoursViolation),

    /// Reservation window is empty or inverted.
    #[error("startTime {} must be earlier than endTime {}", hhmm::format(.start), hhmm::format(.end))]
    InvalidRange {
        /// Requested start
        start: NaiveTime,
        /// Requested end
        end: NaiveTime,
    },

    // ═══════════════════════════════════════════════════════════
    // Input
    // ═══════════════════════════════════════════════════════════

    /// Schema-level validation failed.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness constraint violated (email, venue name).
    #[error("{0}")]
    Conflict(String),

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════

    /// Persistence layer failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Password hashing or verification failed unexpectedly.
    #[error("Credential error: {0}")]
    Credential(String),
}

impl BookingError {
    /// Short machine-readable tag, used as a metrics label and in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VenueNotFound(_) | Self::ReservationNotFound(_) | Self::UserNotFound(_) => {
                "not_found"
            }
            Self::Forbidden { .. } | Self::AdminRequired { .. } => "forbidden",
            Self::InvalidCredentials => "invalid_credentials",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::OutOfHours(_) => "out_of_hours",
            Self::InvalidRange { .. } => "invalid_range",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) | Self::Credential(_) => "internal",
        }
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join(", "))
    }
}
