use crate::DEFAULT_RESERVATION_QUOTA;
use crate::admission;
use crate::error::{BookingError, Result};
use crate::metrics::record_reservation;
use crate::policy::authorize_owner;
use crate::store::{ReservationStore, VenueStore};
use crate::types::{
    Principal, Reservation, ReservationFields, ReservationId, ReservationPatch, ReservationView,
    VenueId, VenueSummary,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Reservation admission and lifecycle.
///
/// Create runs the admission rules of [`crate::admission`]; update, delete
/// and get are gated by [`authorize_owner`].
#[derive(Clone)]
pub struct ReservationService {
    venues: Arc<dyn VenueStore>,
    reservations: Arc<dyn ReservationStore>,
    quota: usize,
}

impl ReservationService {
    /// Create a service with the default quota.
    #[must_use]
    pub fn new(venues: Arc<dyn VenueStore>, reservations: Arc<dyn ReservationStore>) -> Self {
        Self {
            venues,
            reservations,
            quota: DEFAULT_RESERVATION_QUOTA,
        }
    }

    /// Override the per-user reservation quota.
    #[must_use]
    pub const fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    /// The per-user reservation quota.
    #[must_use]
    pub const fn quota(&self) -> usize {
        self.quota
    }

    /// Admit and persist a new reservation at `venue_id`, owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`BookingError::VenueNotFound`] if the venue does not exist
    /// - [`BookingError::QuotaExceeded`] for a non-admin at quota
    /// - [`BookingError::OutOfHours`] if the window leaves opening hours
    /// - [`BookingError::InvalidRange`] if start is not before end
    /// - [`BookingError::Storage`] if persistence fails
    pub async fn create(
        &self,
        principal: &Principal,
        venue_id: VenueId,
        fields: ReservationFields,
    ) -> Result<Reservation> {
        let result = self.admit_and_insert(principal, venue_id, fields).await;
        match &result {
            Ok(reservation) => {
                info!(
                    reservation_id = %reservation.id,
                    user_id = %principal.id,
                    venue_id = %venue_id,
                    "Reservation created"
                );
                record_reservation("created");
            }
            Err(e) => {
                warn!(
                    user_id = %principal.id,
                    venue_id = %venue_id,
                    reason = e.kind(),
                    error = %e,
                    "Reservation rejected"
                );
                record_reservation(e.kind());
            }
        }
        result
    }

    async fn admit_and_insert(
        &self,
        principal: &Principal,
        venue_id: VenueId,
        fields: ReservationFields,
    ) -> Result<Reservation> {
        let venue = self
            .venues
            .find_by_id(venue_id)
            .await?
            .ok_or(BookingError::VenueNotFound(venue_id))?;

        let held = self.reservations.find_by_user(principal.id).await?.len();
        admission::admit(principal, &venue, held, self.quota, &fields)?;

        let reservation = Reservation {
            id: ReservationId::new(),
            user: principal.id,
            venue: venue.id,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            created_at: Utc::now(),
        };
        self.reservations.insert(reservation).await
    }

    /// Fetch one reservation the caller owns (or any, as an admin).
    ///
    /// # Errors
    ///
    /// [`BookingError::ReservationNotFound`] or [`BookingError::Forbidden`].
    pub async fn get(&self, principal: &Principal, id: ReservationId) -> Result<ReservationView> {
        let reservation = self.owned(principal, id).await?;
        let venue_summary = self
            .venues
            .find_by_id(reservation.venue)
            .await?
            .as_ref()
            .map(VenueSummary::from);
        Ok(ReservationView {
            reservation,
            venue_summary,
        })
    }

    /// Reschedule a reservation.
    ///
    /// Only the date and times change. Opening hours and the range rule are
    /// not re-checked.
    ///
    /// # Errors
    ///
    /// [`BookingError::ReservationNotFound`], [`BookingError::Forbidden`] or
    /// [`BookingError::Storage`].
    pub async fn update(
        &self,
        principal: &Principal,
        id: ReservationId,
        patch: ReservationPatch,
    ) -> Result<Reservation> {
        let mut reservation = self.owned(principal, id).await?;
        patch.apply(&mut reservation);
        let reservation = self.reservations.update(reservation).await?;

        info!(reservation_id = %id, user_id = %principal.id, "Reservation updated");
        record_reservation("updated");
        Ok(reservation)
    }

    /// Cancel a reservation.
    ///
    /// # Errors
    ///
    /// [`BookingError::ReservationNotFound`], [`BookingError::Forbidden`] or
    /// [`BookingError::Storage`].
    pub async fn delete(&self, principal: &Principal, id: ReservationId) -> Result<()> {
        self.owned(principal, id).await?;
        self.reservations.delete(id).await?;

        info!(reservation_id = %id, user_id = %principal.id, "Reservation deleted");
        record_reservation("deleted");
        Ok(())
    }

    /// List reservations visible to the caller.
    ///
    /// Members see their own reservations and `venue` is ignored. Admins see
    /// every reservation, narrowed to `venue` when given.
    ///
    /// # Errors
    ///
    /// [`BookingError::Storage`] if a lookup fails.
    pub async fn list(
        &self,
        principal: &Principal,
        venue: Option<VenueId>,
    ) -> Result<Vec<ReservationView>> {
        let reservations = match (principal.is_admin(), venue) {
            (false, _) => self.reservations.find_by_user(principal.id).await?,
            (true, Some(venue)) => self.reservations.find_by_venue(venue).await?,
            (true, None) => self.reservations.find_all().await?,
        };

        let summaries: HashMap<VenueId, VenueSummary> = self
            .venues
            .find_all()
            .await?
            .iter()
            .map(|v| (v.id, VenueSummary::from(v)))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| ReservationView {
                venue_summary: summaries.get(&reservation.venue).cloned(),
                reservation,
            })
            .collect())
    }

    async fn owned(&self, principal: &Principal, id: ReservationId) -> Result<Reservation> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or(BookingError::ReservationNotFound(id))?;

        if let Err(e) = authorize_owner(principal, reservation.user) {
            warn!(reservation_id = %id, user_id = %principal.id, "Access to reservation denied");
            return Err(e);
        }
        Ok(reservation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::services::VenueService;
    use crate::types::{Role, UserId, Venue, hhmm};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use tokio::sync::Mutex;

    fn time(s: &str) -> NaiveTime {
        hhmm::parse(s).unwrap()
    }

    fn fields(start: &str, end: &str) -> ReservationFields {
        ReservationFields {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: time(start),
            end_time: time(end),
        }
    }

    async fn setup() -> (ReservationService, InMemoryStore, VenueId) {
        let store = InMemoryStore::new();
        let venue = Venue {
            id: VenueId::new(),
            name: "Riverside Hub".to_string(),
            address: "113/44 Main Road".to_string(),
            district: "Bang Phlat".to_string(),
            province: "Bangkok".to_string(),
            postalcode: "10700".to_string(),
            region: "Central".to_string(),
            tel: Some("02-000-0000".to_string()),
            open_time: time("08:00"),
            close_time: time("18:00"),
            created_at: Utc::now(),
        };
        let id = venue.id;
        VenueStore::insert(&store, venue).await.unwrap();
        let service = ReservationService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (service, store, id)
    }

    #[tokio::test]
    async fn test_create_persists_reservation() {
        let (service, store, venue) = setup().await;
        let member = Principal::new(UserId::new(), Role::User);

        let created = service
            .create(&member, venue, fields("09:00", "10:00"))
            .await
            .unwrap();

        assert_eq!(created.user, member.id);
        assert_eq!(created.start_time, time("09:00"));
        let stored = ReservationStore::find_by_id(&store, created.id).await;
        assert_eq!(stored, Ok(Some(created)));
    }

    #[tokio::test]
    async fn test_create_at_unknown_venue() {
        let (service, _, _) = setup().await;
        let member = Principal::new(UserId::new(), Role::User);
        let missing = VenueId::new();

        let result = service.create(&member, missing, fields("09:00", "10:00")).await;

        assert_eq!(result, Err(BookingError::VenueNotFound(missing)));
    }

    #[tokio::test]
    async fn test_fourth_reservation_exceeds_quota() {
        let (service, store, venue) = setup().await;
        let member = Principal::new(UserId::new(), Role::User);
        for _ in 0..3 {
            assert!(service.create(&member, venue, fields("09:00", "10:00")).await.is_ok());
        }

        let result = service.create(&member, venue, fields("11:00", "12:00")).await;

        assert!(matches!(result, Err(BookingError::QuotaExceeded { limit: 3, .. })));
        assert_eq!(store.find_by_user(member.id).await.map(|r| r.len()), Ok(3));
    }

    #[tokio::test]
    async fn test_custom_quota() {
        let (service, _, venue) = setup().await;
        let service = service.with_quota(1);
        let member = Principal::new(UserId::new(), Role::User);

        assert!(service.create(&member, venue, fields("09:00", "10:00")).await.is_ok());
        let result = service.create(&member, venue, fields("09:00", "10:00")).await;

        assert!(matches!(result, Err(BookingError::QuotaExceeded { limit: 1, .. })));
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_forbidden() {
        let (service, _, venue) = setup().await;
        let owner = Principal::new(UserId::new(), Role::User);
        let stranger = Principal::new(UserId::new(), Role::User);
        let created = service
            .create(&owner, venue, fields("09:00", "10:00"))
            .await
            .unwrap();

        let patch = ReservationPatch {
            end_time: Some(time("11:00")),
            ..ReservationPatch::default()
        };
        let result = service.update(&stranger, created.id, patch).await;

        assert_eq!(result, Err(BookingError::Forbidden { user: stranger.id }));
    }

    #[tokio::test]
    async fn test_admin_updates_any_reservation() {
        let (service, _, venue) = setup().await;
        let owner = Principal::new(UserId::new(), Role::User);
        let admin = Principal::new(UserId::new(), Role::Admin);
        let created = service
            .create(&owner, venue, fields("09:00", "10:00"))
            .await
            .unwrap();

        let patch = ReservationPatch {
            end_time: Some(time("11:00")),
            ..ReservationPatch::default()
        };
        let updated = service.update(&admin, created.id, patch).await;

        assert_eq!(updated.map(|r| (r.user, r.end_time)), Ok((owner.id, time("11:00"))));
    }

    #[tokio::test]
    async fn test_owner_deletes_own_reservation() {
        let (service, store, venue) = setup().await;
        let owner = Principal::new(UserId::new(), Role::User);
        let stranger = Principal::new(UserId::new(), Role::User);
        let created = service
            .create(&owner, venue, fields("09:00", "10:00"))
            .await
            .unwrap();

        assert_eq!(
            service.delete(&stranger, created.id).await,
            Err(BookingError::Forbidden { user: stranger.id })
        );
        assert_eq!(service.delete(&owner, created.id).await, Ok(()));
        assert_eq!(ReservationStore::find_by_id(&store, created.id).await, Ok(None));
    }

    #[tokio::test]
    async fn test_delete_missing_reservation() {
        let (service, _, _) = setup().await;
        let member = Principal::new(UserId::new(), Role::User);
        let id = ReservationId::new();

        assert_eq!(
            service.delete(&member, id).await,
            Err(BookingError::ReservationNotFound(id))
        );
    }

    #[tokio::test]
    async fn test_list_scopes_members_and_filters_admins() {
        let (service, _, venue) = setup().await;
        let ann = Principal::new(UserId::new(), Role::User);
        let bob = Principal::new(UserId::new(), Role::User);
        let admin = Principal::new(UserId::new(), Role::Admin);
        let _ = service.create(&ann, venue, fields("09:00", "10:00")).await;
        let _ = service.create(&bob, venue, fields("10:00", "11:00")).await;
        let _ = service.create(&bob, venue, fields("11:00", "12:00")).await;

        let mine = service.list(&ann, None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(
            mine[0].venue_summary.as_ref().map(|v| v.name.as_str()),
            Some("Riverside Hub")
        );

        assert_eq!(service.list(&admin, None).await.map(|r| r.len()), Ok(3));
        assert_eq!(service.list(&admin, Some(venue)).await.map(|r| r.len()), Ok(3));
        assert_eq!(
            service.list(&admin, Some(VenueId::new())).await.map(|r| r.len()),
            Ok(0)
        );
    }

    /// Deletes `target` the first time reservations are counted, so the
    /// venue disappears between the venue lookup and the insert.
    struct VenueDeletedMidCreate {
        inner: InMemoryStore,
        venues: VenueService,
        target: VenueId,
        cascaded: Mutex<Option<Result<u64>>>,
    }

    #[async_trait]
    impl ReservationStore for VenueDeletedMidCreate {
        async fn find_all(&self) -> Result<Vec<Reservation>> {
            ReservationStore::find_all(&self.inner).await
        }

        async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>> {
            ReservationStore::find_by_id(&self.inner, id).await
        }

        async fn find_by_user(&self, user: UserId) -> Result<Vec<Reservation>> {
            let mut cascaded = self.cascaded.lock().await;
            if cascaded.is_none() {
                let admin = Principal::new(UserId::new(), Role::Admin);
                *cascaded = Some(self.venues.delete(&admin, self.target).await);
            }
            drop(cascaded);
            self.inner.find_by_user(user).await
        }

        async fn find_by_venue(&self, venue: VenueId) -> Result<Vec<Reservation>> {
            self.inner.find_by_venue(venue).await
        }

        async fn insert(&self, reservation: Reservation) -> Result<Reservation> {
            ReservationStore::insert(&self.inner, reservation).await
        }

        async fn update(&self, reservation: Reservation) -> Result<Reservation> {
            ReservationStore::update(&self.inner, reservation).await
        }

        async fn delete(&self, id: ReservationId) -> Result<()> {
            ReservationStore::delete(&self.inner, id).await
        }

        async fn delete_by_venue(&self, venue: VenueId) -> Result<u64> {
            self.inner.delete_by_venue(venue).await
        }
    }

    #[tokio::test]
    async fn test_venue_deleted_during_create_leaves_no_reservation() {
        let (_, store, venue) = setup().await;
        let interleaved = Arc::new(VenueDeletedMidCreate {
            inner: store.clone(),
            venues: VenueService::new(Arc::new(store.clone())),
            target: venue,
            cascaded: Mutex::new(None),
        });
        let service = ReservationService::new(Arc::new(store.clone()), interleaved.clone());
        let member = Principal::new(UserId::new(), Role::User);

        let result = service.create(&member, venue, fields("09:00", "10:00")).await;

        assert_eq!(result, Err(BookingError::VenueNotFound(venue)));
        assert_eq!(*interleaved.cascaded.lock().await, Some(Ok(0)));
        assert_eq!(VenueStore::find_by_id(&store, venue).await, Ok(None));
        assert_eq!(ReservationStore::find_all(&store).await.map(|r| r.len()), Ok(0));
    }
}
