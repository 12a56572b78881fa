//! # Cowork Core
//!
//! Domain types, admission rules and application services for the
//! co-working booking API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  services (Reservation/Venue/Account)   │  ← orchestration, logging, metrics
//! ├─────────────────────────────────────────┤
//! │  admission + policy                     │  ← pure rules, no I/O
//! ├─────────────────────────────────────────┤
//! │  store traits                           │  ← implemented by `memory`
//! │                                         │    and `cowork-postgres`
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use cowork_core::{memory::InMemoryStore, ReservationService, VenueService};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let reservations = ReservationService::new(store.clone(), store.clone());
//!
//! let created = reservations.create(&principal, venue_id, fields).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod admission;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod policy;
pub mod services;
pub mod store;
pub mod types;

pub use error::{BookingError, HoursViolation, Result};
pub use policy::{Access, authorize_owner, require_admin};
pub use services::{AccountService, ReservationService, VenueService};
pub use store::{ReservationStore, UserStore, VenueStore};
pub use types::{
    NewUser, Principal, Reservation, ReservationFields, ReservationId, ReservationPatch,
    ReservationView, Role, User, UserId, Venue, VenueFields, VenueId, VenuePatch, VenueSummary,
};

/// Maximum number of reservations a non-admin user may hold at once.
pub const DEFAULT_RESERVATION_QUOTA: usize = 3;
