//! Reservation admission rules.
//!
//! Pure checks run before a reservation is persisted. They take everything
//! they need as arguments, so the storage round-trips stay in
//! [`crate::services::ReservationService`].
//!
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. quota (skipped for admins)
//! 2. start not before the venue opens
//! 3. end not after the venue closes
//! 4. start strictly before end

use crate::error::{BookingError, HoursViolation, Result};
use crate::types::{Principal, ReservationFields, Venue};
use chrono::NaiveTime;

/// Reject non-admin callers already holding `quota` reservations.
///
/// # Errors
///
/// Returns [`BookingError::QuotaExceeded`].
pub fn check_quota(principal: &Principal, held: usize, quota: usize) -> Result<()> {
    if held >= quota && !principal.is_admin() {
        return Err(BookingError::QuotaExceeded {
            user: principal.id,
            limit: quota,
        });
    }
    Ok(())
}

/// Reject windows reaching outside `open..=close`.
///
/// # Errors
///
/// Returns [`BookingError::OutOfHours`] naming the crossed edge; the opening
/// edge is checked first.
pub fn check_opening_hours(
    start: NaiveTime,
    end: NaiveTime,
    open: NaiveTime,
    close: NaiveTime,
) -> Result<()> {
    if start < open {
        return Err(BookingError::OutOfHours(HoursViolation::StartsBeforeOpen {
            start,
            open,
        }));
    }
    if end > close {
        return Err(BookingError::OutOfHours(HoursViolation::EndsAfterClose {
            end,
            close,
        }));
    }
    Ok(())
}

/// Reject empty or inverted windows.
///
/// # Errors
///
/// Returns [`BookingError::InvalidRange`] when `start >= end`.
pub fn check_range(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if start >= end {
        return Err(BookingError::InvalidRange { start, end });
    }
    Ok(())
}

/// Run every admission check for a new reservation.
///
/// `held` is the number of reservations the caller currently owns.
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn admit(
    principal: &Principal,
    venue: &Venue,
    held: usize,
    quota: usize,
    fields: &ReservationFields,
) -> Result<()> {
    check_quota(principal, held, quota)?;
    check_opening_hours(
        fields.start_time,
        fields.end_time,
        venue.open_time,
        venue.close_time,
    )?;
    check_range(fields.start_time, fields.end_time)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Role, UserId, VenueId, hhmm};
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    fn time(s: &str) -> NaiveTime {
        hhmm::parse(s).unwrap()
    }

    fn minutes(m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
    }

    fn venue(open: NaiveTime, close: NaiveTime) -> Venue {
        Venue {
            id: VenueId::new(),
            name: "Riverside Hub".to_string(),
            address: "113/44 Main Road".to_string(),
            district: "Bang Phlat".to_string(),
            province: "Bangkok".to_string(),
            postalcode: "10700".to_string(),
            region: "Central".to_string(),
            tel: None,
            open_time: open,
            close_time: close,
            created_at: Utc::now(),
        }
    }

    fn fields(start: NaiveTime, end: NaiveTime) -> ReservationFields {
        ReservationFields {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: start,
            end_time: end,
        }
    }

    fn member() -> Principal {
        Principal::new(UserId::new(), Role::User)
    }

    #[test]
    fn test_window_inside_hours_is_admitted() {
        let venue = venue(time("08:00"), time("18:00"));
        let result = admit(&member(), &venue, 0, 3, &fields(time("09:00"), time("10:00")));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_window_touching_both_edges_is_admitted() {
        let venue = venue(time("08:00"), time("18:00"));
        let result = admit(&member(), &venue, 2, 3, &fields(time("08:00"), time("18:00")));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_early_start_is_out_of_hours() {
        let venue = venue(time("08:00"), time("18:00"));
        let result = admit(&member(), &venue, 0, 3, &fields(time("07:00"), time("10:00")));
        assert!(matches!(
            result,
            Err(BookingError::OutOfHours(HoursViolation::StartsBeforeOpen { .. }))
        ));
    }

    #[test]
    fn test_late_end_is_out_of_hours() {
        let venue = venue(time("08:00"), time("18:00"));
        let result = admit(&member(), &venue, 0, 3, &fields(time("17:00"), time("19:00")));
        assert!(matches!(
            result,
            Err(BookingError::OutOfHours(HoursViolation::EndsAfterClose { .. }))
        ));
    }

    #[test]
    fn test_quota_reported_before_hours() {
        let venue = venue(time("08:00"), time("18:00"));
        let principal = member();
        let result = admit(&principal, &venue, 3, 3, &fields(time("07:00"), time("06:00")));
        assert_eq!(
            result,
            Err(BookingError::QuotaExceeded {
                user: principal.id,
                limit: 3
            })
        );
    }

    #[test]
    fn test_admin_bypasses_quota() {
        let venue = venue(time("08:00"), time("18:00"));
        let admin = Principal::new(UserId::new(), Role::Admin);
        let result = admit(&admin, &venue, 10, 3, &fields(time("09:00"), time("10:00")));
        assert_eq!(result, Ok(()));
    }

    proptest! {
        #[test]
        fn prop_quota_blocks_members_regardless_of_fields(
            held in 3usize..50,
            start in 0u32..1440,
            end in 0u32..1440,
        ) {
            let venue = venue(time("08:00"), time("18:00"));
            let principal = member();
            let result = admit(&principal, &venue, held, 3, &fields(minutes(start), minutes(end)));
            let is_quota_error = matches!(result, Err(BookingError::QuotaExceeded { .. }));
            prop_assert!(is_quota_error);
        }

        #[test]
        fn prop_outside_hours_is_rejected(
            open in 0u32..1440,
            close in 0u32..1440,
            start in 0u32..1440,
            end in 0u32..1440,
        ) {
            prop_assume!(start < open || end > close);
            let venue = venue(minutes(open), minutes(close));
            let result = admit(&member(), &venue, 0, 3, &fields(minutes(start), minutes(end)));
            let is_hours_error = matches!(result, Err(BookingError::OutOfHours(_)));
            prop_assert!(is_hours_error);
        }

        #[test]
        fn prop_inverted_range_is_rejected(start in 0u32..1440, end in 0u32..1440) {
            prop_assume!(start >= end);
            let result = check_range(minutes(start), minutes(end));
            let is_range_error = matches!(result, Err(BookingError::InvalidRange { .. }));
            prop_assert!(is_range_error);
        }

        #[test]
        fn prop_inverted_range_inside_hours_reports_range(start in 480u32..1080, len in 0u32..120) {
            let end = start.saturating_sub(len).max(480);
            let venue = venue(time("08:00"), time("18:00"));
            let result = admit(&member(), &venue, 0, 3, &fields(minutes(start), minutes(end)));
            prop_assert_eq!(result, Err(BookingError::InvalidRange {
                start: minutes(start),
                end: minutes(end),
            }));
        }

        #[test]
        fn prop_valid_window_is_admitted(start in 480u32..1079, len in 1u32..600) {
            let end = (start + len).min(1080);
            let venue = venue(time("08:00"), time("18:00"));
            let result = admit(&member(), &venue, 0, 3, &fields(minutes(start), minutes(end)));
            prop_assert_eq!(result, Ok(()));
        }
    }
}
