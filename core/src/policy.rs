//! Role-based authorization decisions.
//!
//! Two capabilities exist: acting on a resource you own (or any resource, as
//! an admin) and using an admin-only route. Both return a `Result` so callers
//! can short-circuit with `?`.

use crate::error::{BookingError, Result};
use crate::types::{Principal, UserId};

/// Why access to an owned resource was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The caller owns the resource.
    Owner,
    /// The caller is an admin acting on someone else's resource.
    Admin,
}

/// Decide whether `principal` may read or mutate a resource owned by `owner`.
///
/// Ownership wins over role: an admin acting on their own reservation is
/// reported as [`Access::Owner`].
///
/// # Errors
///
/// Returns [`BookingError::Forbidden`] when the caller neither owns the
/// resource nor is an admin.
pub fn authorize_owner(principal: &Principal, owner: UserId) -> Result<Access> {
    if principal.id == owner {
        Ok(Access::Owner)
    } else if principal.is_admin() {
        Ok(Access::Admin)
    } else {
        Err(BookingError::Forbidden { user: principal.id })
    }
}

/// Require the admin role.
///
/// # Errors
///
/// Returns [`BookingError::AdminRequired`] for non-admin callers.
pub fn require_admin(principal: &Principal) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(BookingError::AdminRequired {
            role: principal.role,
        })
    }
}
