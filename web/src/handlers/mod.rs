//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod reservations;
pub mod venues;

pub use health::health_check;
