// Ledger database connection management
use crate::error::{StoreError, StoreResult};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Read-only connection pool over the accounting database.
///
/// Constructed once at process start and injected into the store; the
/// forecasting engine never writes, so the pool carries no transactional
/// state.
#[derive(Clone)]
pub struct LedgerPool {
    pool: Arc<PgPool>,
}

impl LedgerPool {
    /// Create a new pool from a connection string
    pub async fn connect(connection_string: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!("Ledger connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Ledger health check failed: {}", e);
                false
            }
        }
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Ledger connection pool closed");
    }
}
