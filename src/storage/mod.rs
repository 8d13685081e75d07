//! SQLite storage layer
//!
//! [`Database`] owns the connection pool. Queries are grouped by table in
//! the submodules, each adding methods to `Database`.

mod attendance;
mod bookings;
pub mod models;
mod reports;
pub mod schema;
mod seed;
mod slots;
mod users;

pub use attendance::AttendanceMode;
pub use bookings::BookingOutcome;
pub use models::*;

use crate::config::{ApiVariant, DatabaseConfig};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use tracing::info;

/// Handle to the application database
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the SQLite file named in the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(path = %config.path, max_connections = config.max_connections, "Connected to database");

        Ok(Self { pool })
    }

    /// Create tables for the given variant and optionally load sample data
    pub async fn initialize(&self, variant: ApiVariant, seed: bool) -> Result<()> {
        schema::create_tables(&self.pool, variant).await?;
        if seed {
            self.seed_sample_data().await?;
        }
        Ok(())
    }

    /// Cheap liveness probe
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

/// Current local time in the `YYYY-MM-DD HH:MM:SS` form used for timestamps
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
