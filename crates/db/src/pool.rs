//! Database connection pool management.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::ConnectionDescriptor;
use crate::writer::WriteError;

/// Database connection pool wrapper.
///
/// A run holds a single connection for the duration of the write.
#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Open a pool from a resolved connection descriptor.
    ///
    /// # Arguments
    /// * `descriptor` - Resolved PostgreSQL connection string
    ///
    /// # Returns
    /// A new `DbPool` instance, or `WriteError::Connect` when the server
    /// cannot be reached or rejects the credentials
    pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Self, WriteError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(descriptor.connection_string())
            .await
            .map_err(|source| WriteError::Connect {
                target: descriptor.redacted(),
                source,
            })?;

        info!("Connected to database at {}", descriptor);

        Ok(Self { pool })
    }

    /// Get a reference to the underlying PostgreSQL pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
