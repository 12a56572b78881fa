//! `PostgreSQL` stores for the co-working booking API.
//!
//! [`PostgresStore`] implements [`VenueStore`](cowork_core::VenueStore),
//! [`ReservationStore`](cowork_core::ReservationStore) and
//! [`UserStore`](cowork_core::UserStore) over a single connection pool.
//! Schema changes live in `migrations/` and are applied with
//! [`PostgresStore::migrate`].
//!
//! # Example
//!
//! ```no_run
//! use cowork_postgres::PostgresStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresStore::connect("postgres://localhost/cowork", 10).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod reservations;
mod rows;
mod users;
mod venues;

use cowork_core::{BookingError, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// `PostgreSQL`-backed store.
///
/// Cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with at most `max_connections` connections.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Storage`] if the connection fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        Self::connect_with_timeout(database_url, max_connections, Duration::from_secs(30)).await
    }

    /// Like [`connect`](Self::connect), with an explicit acquire timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Storage`] if the connection fails.
    pub async fn connect_with_timeout(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| BookingError::Storage(format!("Failed to connect: {e}")))?;
        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::from_pool(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BookingError::Storage(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a sqlx error, turning unique violations into a conflict.
fn db_error(action: &str, conflict: impl FnOnce() -> String) -> impl FnOnce(sqlx::Error) -> BookingError {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return BookingError::Conflict(conflict());
            }
        }
        BookingError::Storage(format!("Failed to {action}: {e}"))
    }
}

fn storage(action: &str) -> impl FnOnce(sqlx::Error) -> BookingError + '_ {
    move |e| BookingError::Storage(format!("Failed to {action}: {e}"))
}
