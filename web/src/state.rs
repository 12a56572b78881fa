//! Application state shared by every handler.

use crate::auth::TokenIssuer;
use cowork_core::{
    AccountService, ReservationService, ReservationStore, UserStore, VenueService, VenueStore,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub accounts: AccountService,
    /// Venue management
    pub venues: VenueService,
    /// Reservation admission and lifecycle
    pub reservations: ReservationService,
    /// Bearer token signing and verification
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Wire services over the given stores.
    #[must_use]
    pub fn new(
        venue_store: Arc<dyn VenueStore>,
        reservation_store: Arc<dyn ReservationStore>,
        user_store: Arc<dyn UserStore>,
        tokens: TokenIssuer,
        quota: usize,
    ) -> Self {
        Self {
            accounts: AccountService::new(user_store),
            venues: VenueService::new(venue_store.clone()),
            reservations: ReservationService::new(venue_store, reservation_store).with_quota(quota),
            tokens: Arc::new(tokens),
        }
    }
}
