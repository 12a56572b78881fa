use crate::rows::VenueRow;
use crate::{PostgresStore, db_error, storage};
use async_trait::async_trait;
use cowork_core::{BookingError, Result, Venue, VenueId, VenueStore};

const COLUMNS: &str =
    "id, name, address, district, province, postalcode, region, tel, open_time, close_time, created_at";

#[async_trait]
impl VenueStore for PostgresStore {
    async fn find_all(&self) -> Result<Vec<Venue>> {
        let rows: Vec<VenueRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM venues ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await
                .map_err(storage("list venues"))?;
        Ok(rows.into_iter().map(Venue::from).collect())
    }

    async fn find_by_id(&self, id: VenueId) -> Result<Option<Venue>> {
        let row: Option<VenueRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM venues WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage("get venue"))?;
        Ok(row.map(Venue::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>> {
        let row: Option<VenueRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM venues WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage("get venue by name"))?;
        Ok(row.map(Venue::from))
    }

    async fn insert(&self, venue: Venue) -> Result<Venue> {
        sqlx::query(&format!(
            "INSERT INTO venues ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(venue.id.as_uuid())
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.district)
        .bind(&venue.province)
        .bind(&venue.postalcode)
        .bind(&venue.region)
        .bind(&venue.tel)
        .bind(venue.open_time)
        .bind(venue.close_time)
        .bind(venue.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create venue", || {
            format!("Venue name '{}' is already taken", venue.name)
        }))?;
        Ok(venue)
    }

    async fn update(&self, venue: Venue) -> Result<Venue> {
        let result = sqlx::query(
            r"
            UPDATE venues
            SET name = $2, address = $3, district = $4, province = $5, postalcode = $6,
                region = $7, tel = $8, open_time = $9, close_time = $10
            WHERE id = $1
            ",
        )
        .bind(venue.id.as_uuid())
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.district)
        .bind(&venue.province)
        .bind(&venue.postalcode)
        .bind(&venue.region)
        .bind(&venue.tel)
        .bind(venue.open_time)
        .bind(venue.close_time)
        .execute(&self.pool)
        .await
        .map_err(db_error("update venue", || {
            format!("Venue name '{}' is already taken", venue.name)
        }))?;

        if result.rows_affected() == 0 {
            return Err(BookingError::VenueNotFound(venue.id));
        }
        Ok(venue)
    }

    async fn delete(&self, id: VenueId) -> Result<()> {
        sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage("delete venue"))?;
        Ok(())
    }

    async fn delete_cascade(&self, id: VenueId) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("start venue delete"))?;

        // Row lock conflicts with the key-share lock a reservation insert
        // takes on its venue, so inserts wait for this transaction and then
        // fail their foreign key check.
        let locked: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM venues WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage("lock venue"))?;
        if locked.is_none() {
            let _ = tx.rollback().await;
            return Err(BookingError::VenueNotFound(id));
        }

        let cascaded = sqlx::query("DELETE FROM reservations WHERE venue_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage("delete reservations for venue"))?
            .rows_affected();
        sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage("delete venue"))?;

        tx.commit().await.map_err(storage("commit venue delete"))?;
        Ok(cascaded)
    }
}
