use crate::error::{BookingError, Result};
use crate::metrics::record_venue_deleted;
use crate::policy::require_admin;
use crate::store::VenueStore;
use crate::types::{Principal, Venue, VenueFields, VenueId, VenuePatch};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Venue management.
///
/// Reads are public; every mutation requires the admin role. Deleting a
/// venue removes its reservations in the same step.
#[derive(Clone)]
pub struct VenueService {
    venues: Arc<dyn VenueStore>,
}

impl VenueService {
    /// Create a venue service.
    #[must_use]
    pub fn new(venues: Arc<dyn VenueStore>) -> Self {
        Self { venues }
    }

    /// All venues, oldest first.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] if the lookup fails.
    pub async fn list(&self) -> Result<Vec<Venue>> {
        self.venues.find_all().await
    }

    /// Fetch one venue.
    ///
    /// # Errors
    ///
    /// [`BookingError::VenueNotFound`] if it does not exist.
    pub async fn get(&self, id: VenueId) -> Result<Venue> {
        self.venues
            .find_by_id(id)
            .await?
            .ok_or(BookingError::VenueNotFound(id))
    }

    /// Create a venue.
    ///
    /// # Errors
    ///
    /// [`BookingError::AdminRequired`], [`BookingError::Validation`] or
    /// [`BookingError::Conflict`] when the name is taken.
    pub async fn create(&self, principal: &Principal, fields: VenueFields) -> Result<Venue> {
        require_admin(principal)?;
        let fields = fields.normalize()?;
        self.ensure_name_free(&fields.name, None).await?;

        let venue = self
            .venues
            .insert(Venue::from_fields(VenueId::new(), fields, Utc::now()))
            .await?;
        info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    /// Update a venue; absent fields keep their value.
    ///
    /// # Errors
    ///
    /// [`BookingError::AdminRequired`], [`BookingError::VenueNotFound`],
    /// [`BookingError::Validation`] or [`BookingError::Conflict`].
    pub async fn update(&self, principal: &Principal, id: VenueId, patch: VenuePatch) -> Result<Venue> {
        require_admin(principal)?;
        let current = self.get(id).await?;
        let fields = patch.apply(current.fields()).normalize()?;
        self.ensure_name_free(&fields.name, Some(id)).await?;

        let venue = self
            .venues
            .update(Venue::from_fields(id, fields, current.created_at))
            .await?;
        info!(venue_id = %id, "Venue updated");
        Ok(venue)
    }

    /// Delete a venue together with every reservation made for it.
    ///
    /// Returns the number of reservations removed.
    ///
    /// # Errors
    ///
    /// [`BookingError::AdminRequired`], [`BookingError::VenueNotFound`] or
    /// [`BookingError::Storage`].
    pub async fn delete(&self, principal: &Principal, id: VenueId) -> Result<u64> {
        require_admin(principal)?;
        let cascaded = self.venues.delete_cascade(id).await?;

        info!(venue_id = %id, cascaded, "Venue deleted");
        record_venue_deleted(cascaded);
        Ok(cascaded)
    }

    async fn ensure_name_free(&self, name: &str, except: Option<VenueId>) -> Result<()> {
        match self.venues.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(BookingError::Conflict(format!(
                "Venue name '{name}' is already taken"
            ))),
            _ => Ok(()),
        }
    }
}
