//! Row types and their conversion into domain records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use cowork_core::{
    BookingError, Reservation, ReservationId, Result, Role, User, UserId, Venue, VenueId,
};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct VenueRow {
    id: Uuid,
    name: String,
    address: String,
    district: String,
    province: String,
    postalcode: String,
    region: String,
    tel: Option<String>,
    open_time: NaiveTime,
    close_time: NaiveTime,
    created_at: DateTime<Utc>,
}

impl From<VenueRow> for Venue {
    fn from(row: VenueRow) -> Self {
        Self {
            id: VenueId::from_uuid(row.id),
            name: row.name,
            address: row.address,
            district: row.district,
            province: row.province,
            postalcode: row.postalcode,
            region: row.region,
            tel: row.tel,
            open_time: row.open_time,
            close_time: row.close_time,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReservationRow {
    id: Uuid,
    user_id: Uuid,
    venue_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    created_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: ReservationId::from_uuid(row.id),
            user: UserId::from_uuid(row.user_id),
            venue: VenueId::from_uuid(row.venue_id),
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    tel: Option<String>,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = BookingError;

    fn try_from(row: UserRow) -> Result<Self> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| BookingError::Storage(format!("Corrupt role '{}' for user {}", row.role, row.id)))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            tel: row.tel,
            role,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}
