use crate::rows::ReservationRow;
use crate::{PostgresStore, storage};
use async_trait::async_trait;
use cowork_core::{
    BookingError, Reservation, ReservationId, ReservationStore, Result, UserId, VenueId,
};

const COLUMNS: &str = "id, user_id, venue_id, date, start_time, end_time, created_at";

/// Default name of the `venue_id` foreign key.
const VENUE_FK: &str = "reservations_venue_id_fkey";

/// Map an insert failure; a dangling reference names the missing record.
fn insert_error(reservation: &Reservation) -> impl FnOnce(sqlx::Error) -> BookingError + '_ {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return if db_err.constraint() == Some(VENUE_FK) {
                    BookingError::VenueNotFound(reservation.venue)
                } else {
                    BookingError::UserNotFound(reservation.user)
                };
            }
        }
        BookingError::Storage(format!("Failed to create reservation: {e}"))
    }
}

impl PostgresStore {
    async fn fetch_reservations(
        &self,
        filter: &str,
        id: Option<uuid::Uuid>,
    ) -> Result<Vec<Reservation>> {
        let sql = format!("SELECT {COLUMNS} FROM reservations {filter} ORDER BY created_at");
        let mut query = sqlx::query_as::<_, ReservationRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(storage("list reservations"))?;
        Ok(rows.into_iter().map(Reservation::from).collect())
    }
}

#[async_trait]
impl ReservationStore for PostgresStore {
    async fn find_all(&self) -> Result<Vec<Reservation>> {
        self.fetch_reservations("", None).await
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reservations WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage("get reservation"))?;
        Ok(row.map(Reservation::from))
    }

    async fn find_by_user(&self, user: UserId) -> Result<Vec<Reservation>> {
        self.fetch_reservations("WHERE user_id = $1", Some(*user.as_uuid()))
            .await
    }

    async fn find_by_venue(&self, venue: VenueId) -> Result<Vec<Reservation>> {
        self.fetch_reservations("WHERE venue_id = $1", Some(*venue.as_uuid()))
            .await
    }

    async fn insert(&self, reservation: Reservation) -> Result<Reservation> {
        sqlx::query(&format!(
            "INSERT INTO reservations ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(reservation.id.as_uuid())
        .bind(reservation.user.as_uuid())
        .bind(reservation.venue.as_uuid())
        .bind(reservation.date)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.created_at)
        .execute(&self.pool)
        .await
        .map_err(insert_error(&reservation))?;
        Ok(reservation)
    }

    async fn update(&self, reservation: Reservation) -> Result<Reservation> {
        let result = sqlx::query(
            "UPDATE reservations SET date = $2, start_time = $3, end_time = $4 WHERE id = $1",
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.date)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .execute(&self.pool)
        .await
        .map_err(storage("update reservation"))?;

        if result.rows_affected() == 0 {
            return Err(BookingError::ReservationNotFound(reservation.id));
        }
        Ok(reservation)
    }

    async fn delete(&self, id: ReservationId) -> Result<()> {
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage("delete reservation"))?;
        Ok(())
    }

    async fn delete_by_venue(&self, venue: VenueId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM reservations WHERE venue_id = $1")
            .bind(venue.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage("delete reservations for venue"))?;
        Ok(result.rows_affected())
    }
}
