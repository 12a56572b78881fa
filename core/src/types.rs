//! Domain types for the booking API.
//!
//! Identifiers, roles and principals, venues, reservations and user accounts.
//! Request-shaped types (`*Fields`, `*Patch`, [`NewUser`]) carry the
//! schema-level validation rules; the business rules live in
//! [`crate::admission`] and [`crate::policy`].

use crate::error::{BookingError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user account
    UserId
);
define_id!(
    /// Unique identifier for a venue
    VenueId
);
define_id!(
    /// Unique identifier for a reservation
    ReservationId
);

// ============================================================================
// Roles and principals
// ============================================================================

/// Role of an authenticated caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member, bound by ownership and quota rules
    #[default]
    User,
    /// Administrator, bypasses ownership and quota rules
    Admin,
}

impl Role {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(BookingError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

/// The authenticated caller of an operation.
///
/// Produced by the authentication layer from a verified token; services
/// only ever receive it by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    /// Caller's user ID
    pub id: UserId,
    /// Caller's role
    pub role: Role,
}

impl Principal {
    /// Create a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether the caller is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// ============================================================================
// Time-of-day serialization
// ============================================================================

/// Serde adapter for `HH:MM` wall-clock times.
///
/// Seconds are accepted on input (`HH:MM:SS`) but never emitted.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    /// Parse a time of day.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error when the input matches neither
    /// `HH:MM` nor `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }

    /// Format a time of day as `HH:MM`.
    #[must_use]
    pub fn format(time: &NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }

    #[allow(clippy::trivially_copy_pass_by_ref, missing_docs)]
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(time))
    }

    #[allow(missing_docs)]
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).map_err(|_| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }

    /// Same adapter for optional fields.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        #[allow(clippy::ref_option, missing_docs)]
        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&super::format(time)),
                None => serializer.serialize_none(),
            }
        }

        #[allow(missing_docs)]
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| {
                    super::parse(raw.trim())
                        .map_err(|_| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
                })
                .transpose()
        }
    }
}

// ============================================================================
// Venues
// ============================================================================

/// A co-working venue that can be reserved during its opening hours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue ID
    pub id: VenueId,
    /// Display name (unique)
    pub name: String,
    /// House number, street, road
    pub address: String,
    /// District
    pub district: String,
    /// Province
    pub province: String,
    /// Postal code (at most 5 characters)
    pub postalcode: String,
    /// Region
    pub region: String,
    /// Telephone number
    pub tel: Option<String>,
    /// Opening time
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    /// Closing time
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Venue {
    /// Build a venue record from validated fields.
    #[must_use]
    pub fn from_fields(id: VenueId, fields: VenueFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            address: fields.address,
            district: fields.district,
            province: fields.province,
            postalcode: fields.postalcode,
            region: fields.region,
            tel: fields.tel,
            open_time: fields.open_time,
            close_time: fields.close_time,
            created_at,
        }
    }

    /// The venue's editable fields.
    #[must_use]
    pub fn fields(&self) -> VenueFields {
        VenueFields {
            name: self.name.clone(),
            address: self.address.clone(),
            district: self.district.clone(),
            province: self.province.clone(),
            postalcode: self.postalcode.clone(),
            region: self.region.clone(),
            tel: self.tel.clone(),
            open_time: self.open_time,
            close_time: self.close_time,
        }
    }
}

/// Editable venue fields, as submitted on create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VenueFields {
    /// Display name
    #[validate(length(min = 1, max = 50, message = "Name can not be more than 50 characters"))]
    pub name: String,
    /// House number, street, road
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    /// District
    #[validate(length(min = 1, message = "Please add a district"))]
    pub district: String,
    /// Province
    #[validate(length(min = 1, message = "Please add a province"))]
    pub province: String,
    /// Postal code
    #[validate(length(min = 1, max = 5, message = "Postal Code can not be more than 5 digits"))]
    pub postalcode: String,
    /// Region
    #[validate(length(min = 1, message = "Please add a region"))]
    pub region: String,
    /// Telephone number
    #[serde(default)]
    pub tel: Option<String>,
    /// Opening time
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    /// Closing time
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
}

impl VenueFields {
    /// Trim the name and run the schema rules.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when a field rule fails or the
    /// venue would close before it opens.
    pub fn normalize(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.validate()?;

        if self.open_time >= self.close_time {
            return Err(BookingError::Validation(format!(
                "open_time {} must be earlier than close_time {}",
                hhmm::format(&self.open_time),
                hhmm::format(&self.close_time),
            )));
        }

        Ok(self)
    }
}

/// Partial venue update; absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct VenuePatch {
    /// Display name
    pub name: Option<String>,
    /// House number, street, road
    pub address: Option<String>,
    /// District
    pub district: Option<String>,
    /// Province
    pub province: Option<String>,
    /// Postal code
    pub postalcode: Option<String>,
    /// Region
    pub region: Option<String>,
    /// Telephone number
    pub tel: Option<String>,
    /// Opening time
    #[serde(default, with = "hhmm::option")]
    pub open_time: Option<NaiveTime>,
    /// Closing time
    #[serde(default, with = "hhmm::option")]
    pub close_time: Option<NaiveTime>,
}

impl VenuePatch {
    /// Merge the patch over the current fields.
    #[must_use]
    pub fn apply(self, current: VenueFields) -> VenueFields {
        VenueFields {
            name: self.name.unwrap_or(current.name),
            address: self.address.unwrap_or(current.address),
            district: self.district.unwrap_or(current.district),
            province: self.province.unwrap_or(current.province),
            postalcode: self.postalcode.unwrap_or(current.postalcode),
            region: self.region.unwrap_or(current.region),
            tel: self.tel.or(current.tel),
            open_time: self.open_time.unwrap_or(current.open_time),
            close_time: self.close_time.unwrap_or(current.close_time),
        }
    }
}

/// Compact venue description embedded in reservation listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSummary {
    /// Venue ID
    pub id: VenueId,
    /// Display name
    pub name: String,
    /// Province
    pub province: String,
    /// Telephone number
    pub tel: Option<String>,
}

impl From<&Venue> for VenueSummary {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            province: venue.province.clone(),
            tel: venue.tel.clone(),
        }
    }
}

// ============================================================================
// Reservations
// ============================================================================

/// A booked time window at a venue, owned by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Reservation ID
    pub id: ReservationId,
    /// Owner
    pub user: UserId,
    /// Reserved venue
    pub venue: VenueId,
    /// Day of the booking
    pub date: NaiveDate,
    /// Start of the window
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End of the window
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating a reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationFields {
    /// Day of the booking
    pub date: NaiveDate,
    /// Start of the window
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End of the window
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

/// Partial reservation update.
///
/// Only the schedule can change; owner and venue are fixed at creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    /// New day
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New start
    #[serde(default, with = "hhmm::option")]
    pub start_time: Option<NaiveTime>,
    /// New end
    #[serde(default, with = "hhmm::option")]
    pub end_time: Option<NaiveTime>,
}

impl ReservationPatch {
    /// Apply the patch to a reservation in place.
    pub fn apply(&self, reservation: &mut Reservation) {
        if let Some(date) = self.date {
            reservation.date = date;
        }
        if let Some(start_time) = self.start_time {
            reservation.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            reservation.end_time = end_time;
        }
    }
}

/// A reservation together with a summary of its venue, for read endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    /// The reservation record
    #[serde(flatten)]
    pub reservation: Reservation,
    /// Venue summary (absent only if the venue vanished mid-request)
    pub venue_summary: Option<VenueSummary>,
}

// ============================================================================
// Users
// ============================================================================

/// A registered account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email (lower-cased)
    pub email: String,
    /// Telephone number
    pub tel: Option<String>,
    /// Role
    pub role: Role,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The principal this account authenticates as.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// Registration request.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewUser {
    /// Display name
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    /// Login email
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    /// Telephone number
    #[serde(default)]
    pub tel: Option<String>,
    /// Requested role (defaults to `user`)
    #[serde(default)]
    pub role: Role,
    /// Plain-text password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn time(s: &str) -> NaiveTime {
        hhmm::parse(s).unwrap()
    }

    fn fields() -> VenueFields {
        VenueFields {
            name: "  Riverside Hub ".to_string(),
            address: "113/44 Main Road".to_string(),
            district: "Bang Phlat".to_string(),
            province: "Bangkok".to_string(),
            postalcode: "10700".to_string(),
            region: "Central".to_string(),
            tel: None,
            open_time: time("08:00"),
            close_time: time("18:00"),
        }
    }

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("admin".parse::<Role>().ok(), Some(Role::Admin));
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_hhmm_accepts_seconds() {
        assert_eq!(hhmm::parse("09:30:00").ok(), hhmm::parse("09:30").ok());
        assert!(hhmm::parse("9h30").is_err());
    }

    #[test]
    fn test_venue_fields_trim_name() {
        let normalized = fields().normalize();
        assert_eq!(normalized.map(|f| f.name).ok().as_deref(), Some("Riverside Hub"));
    }

    #[test]
    fn test_venue_fields_reject_long_postal_code() {
        let mut bad = fields();
        bad.postalcode = "107000".to_string();
        assert!(matches!(bad.normalize(), Err(BookingError::Validation(_))));
    }

    #[test]
    fn test_venue_fields_reject_inverted_hours() {
        let mut bad = fields();
        bad.open_time = time("19:00");
        assert!(matches!(bad.normalize(), Err(BookingError::Validation(_))));
    }

    #[test]
    fn test_reservation_wire_format() {
        let reservation = Reservation {
            id: ReservationId::new(),
            user: UserId::new(),
            venue: VenueId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: time("09:00"),
            end_time: time("10:30"),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&reservation).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "10:30");
        assert_eq!(json["date"], "2025-03-14");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut reservation = Reservation {
            id: ReservationId::new(),
            user: UserId::new(),
            venue: VenueId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: time("09:00"),
            end_time: time("10:00"),
            created_at: Utc::now(),
        };
        let patch: ReservationPatch =
            serde_json::from_str(r#"{"endTime":"11:00"}"#).unwrap();

        patch.apply(&mut reservation);

        assert_eq!(reservation.start_time, time("09:00"));
        assert_eq!(reservation.end_time, time("11:00"));
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: UserId::new(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            tel: None,
            role: Role::User,
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
