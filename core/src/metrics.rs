//! Business metrics.
//!
//! # Exported Metrics
//!
//! - `cowork_reservations_total{outcome}` - Reservation attempts by outcome
//!   (`created`, `updated`, `deleted`, or the rejection's error kind)
//! - `cowork_venues_deleted_total` - Venues removed
//! - `cowork_reservations_cascaded_total` - Reservations removed by venue deletion

use metrics::describe_counter;

/// Reservation attempts by outcome.
pub const RESERVATIONS_TOTAL: &str = "cowork_reservations_total";
/// Venues removed.
pub const VENUES_DELETED_TOTAL: &str = "cowork_venues_deleted_total";
/// Reservations removed by venue deletion.
pub const RESERVATIONS_CASCADED_TOTAL: &str = "cowork_reservations_cascaded_total";

/// Register metric descriptions. Call once at startup.
pub fn register_business_metrics() {
    describe_counter!(
        RESERVATIONS_TOTAL,
        "Reservation operations by outcome (created, updated, deleted, or rejection kind)"
    );
    describe_counter!(VENUES_DELETED_TOTAL, "Total number of venues deleted");
    describe_counter!(
        RESERVATIONS_CASCADED_TOTAL,
        "Reservations removed because their venue was deleted"
    );

    tracing::info!("Business metrics registered");
}

pub(crate) fn record_reservation(outcome: &'static str) {
    metrics::counter!(RESERVATIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_venue_deleted(cascaded: u64) {
    metrics::counter!(VENUES_DELETED_TOTAL).increment(1);
    metrics::counter!(RESERVATIONS_CASCADED_TOTAL).increment(cascaded);
    tracing::debug!(cascaded, "Recorded venue_deleted metric");
}
