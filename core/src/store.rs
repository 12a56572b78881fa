//! Persistence traits.
//!
//! Services depend on these traits only. Two implementations exist: the
//! in-memory [`crate::memory::InMemoryStore`] and the PostgreSQL store in
//! `cowork-postgres`.
//!
//! Lookups return `Ok(None)` for a missing record; turning absence into a
//! domain error is the caller's decision.

use crate::error::Result;
use crate::types::{Reservation, ReservationId, User, UserId, Venue, VenueId};
use async_trait::async_trait;

/// Venue storage.
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// All venues, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_all(&self) -> Result<Vec<Venue>>;

    /// Fetch a venue by ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_id(&self, id: VenueId) -> Result<Option<Venue>>;

    /// Fetch a venue by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>>;

    /// Insert a new venue.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Conflict`] on a duplicate name, or
    /// [`crate::BookingError::Storage`] if the backend fails.
    async fn insert(&self, venue: Venue) -> Result<Venue>;

    /// Replace an existing venue.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::VenueNotFound`] if the venue is gone.
    async fn update(&self, venue: Venue) -> Result<Venue>;

    /// Remove a venue. Removing a missing venue is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails, e.g.
    /// because reservations still reference the venue.
    async fn delete(&self, id: VenueId) -> Result<()>;

    /// Remove a venue and every reservation referencing it in one atomic
    /// step, returning how many reservations were removed.
    ///
    /// A reservation inserted concurrently either lands before the step and
    /// is removed with the venue, or after it and is rejected because the
    /// venue is gone.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::VenueNotFound`] if the venue is gone,
    /// or [`crate::BookingError::Storage`] if the backend fails.
    async fn delete_cascade(&self, id: VenueId) -> Result<u64>;
}

/// Reservation storage.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// All reservations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_all(&self) -> Result<Vec<Reservation>>;

    /// Fetch a reservation by ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>>;

    /// Reservations owned by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_user(&self, user: UserId) -> Result<Vec<Reservation>>;

    /// Reservations at a venue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_venue(&self, venue: VenueId) -> Result<Vec<Reservation>>;

    /// Insert a new reservation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::VenueNotFound`] if the referenced venue
    /// no longer exists, or [`crate::BookingError::Storage`] if the backend
    /// fails.
    async fn insert(&self, reservation: Reservation) -> Result<Reservation>;

    /// Replace an existing reservation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::ReservationNotFound`] if it is gone.
    async fn update(&self, reservation: Reservation) -> Result<Reservation>;

    /// Remove a reservation. Removing a missing reservation is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn delete(&self, id: ReservationId) -> Result<()>;

    /// Remove every reservation at a venue, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn delete_by_venue(&self, venue: VenueId) -> Result<u64>;
}

/// User account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Fetch a user by (lower-cased) email.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Storage`] if the backend fails.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Conflict`] if the email is taken.
    async fn insert(&self, user: User) -> Result<User>;
}
