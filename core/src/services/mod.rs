//! Use cases.
//!
//! Each service owns `Arc` handles to the stores it needs and takes the
//! caller's [`crate::Principal`] explicitly. Services are cheap to clone and
//! shared by every request.

mod accounts;
mod reservations;
mod venues;

pub use accounts::AccountService;
pub use reservations::ReservationService;
pub use venues::VenueService;
