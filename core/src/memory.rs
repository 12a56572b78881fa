//! In-memory store.
//!
//! Implements every store trait over `HashMap`s behind `tokio` locks. Used by
//! the server when no `DATABASE_URL` is configured and by the test suites.
//! Data lives as long as the process.
//!
//! Operations touching both venues and reservations lock `venues` first.

use crate::error::{BookingError, Result};
use crate::store::{ReservationStore, UserStore, VenueStore};
use crate::types::{Reservation, ReservationId, User, UserId, Venue, VenueId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`VenueStore`], [`ReservationStore`] and
/// [`UserStore`].
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    venues: Arc<RwLock<HashMap<VenueId, Venue>>>,
    reservations: Arc<RwLock<HashMap<ReservationId, Reservation>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl VenueStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Venue>> {
        let venues = self.venues.read().await;
        Ok(sorted(venues.values().cloned().collect(), |v| v.created_at))
    }

    async fn find_by_id(&self, id: VenueId) -> Result<Option<Venue>> {
        Ok(self.venues.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>> {
        let venues = self.venues.read().await;
        Ok(venues.values().find(|v| v.name == name).cloned())
    }

    async fn insert(&self, venue: Venue) -> Result<Venue> {
        let mut venues = self.venues.write().await;
        if venues.values().any(|v| v.name == venue.name) {
            return Err(BookingError::Conflict(format!(
                "Venue name '{}' is already taken",
                venue.name
            )));
        }
        venues.insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn update(&self, venue: Venue) -> Result<Venue> {
        let mut venues = self.venues.write().await;
        if venues.values().any(|v| v.name == venue.name && v.id != venue.id) {
            return Err(BookingError::Conflict(format!(
                "Venue name '{}' is already taken",
                venue.name
            )));
        }
        match venues.get_mut(&venue.id) {
            Some(slot) => {
                *slot = venue.clone();
                Ok(venue)
            }
            None => Err(BookingError::VenueNotFound(venue.id)),
        }
    }

    async fn delete(&self, id: VenueId) -> Result<()> {
        let mut venues = self.venues.write().await;
        // Mirror the foreign key the PostgreSQL schema enforces.
        let reservations = self.reservations.read().await;
        if reservations.values().any(|r| r.venue == id) {
            return Err(BookingError::Storage(format!(
                "venue {id} is still referenced by reservations"
            )));
        }
        venues.remove(&id);
        Ok(())
    }

    async fn delete_cascade(&self, id: VenueId) -> Result<u64> {
        let mut venues = self.venues.write().await;
        let mut reservations = self.reservations.write().await;
        if venues.remove(&id).is_none() {
            return Err(BookingError::VenueNotFound(id));
        }
        let before = reservations.len();
        reservations.retain(|_, r| r.venue != id);
        Ok((before - reservations.len()) as u64)
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(sorted(reservations.values().cloned().collect(), |r| r.created_at))
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Ok(self.reservations.read().await.get(&id).cloned())
    }

    async fn find_by_user(&self, user: UserId) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(sorted(
            reservations.values().filter(|r| r.user == user).cloned().collect(),
            |r| r.created_at,
        ))
    }

    async fn find_by_venue(&self, venue: VenueId) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(sorted(
            reservations.values().filter(|r| r.venue == venue).cloned().collect(),
            |r| r.created_at,
        ))
    }

    async fn insert(&self, reservation: Reservation) -> Result<Reservation> {
        let venues = self.venues.read().await;
        if !venues.contains_key(&reservation.venue) {
            return Err(BookingError::VenueNotFound(reservation.venue));
        }
        self.reservations
            .write()
            .await
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update(&self, reservation: Reservation) -> Result<Reservation> {
        let mut reservations = self.reservations.write().await;
        match reservations.get_mut(&reservation.id) {
            Some(slot) => {
                *slot = reservation.clone();
                Ok(reservation)
            }
            None => Err(BookingError::ReservationNotFound(reservation.id)),
        }
    }

    async fn delete(&self, id: ReservationId) -> Result<()> {
        self.reservations.write().await.remove(&id);
        Ok(())
    }

    async fn delete_by_venue(&self, venue: VenueId) -> Result<u64> {
        let mut reservations = self.reservations.write().await;
        let before = reservations.len();
        reservations.retain(|_, r| r.venue != venue);
        Ok((before - reservations.len()) as u64)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(BookingError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
