// Database connection management
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::error::{DatabaseError, DatabaseResult};

/// Open a PostgreSQL connection pool.
pub async fn connect_pool(connection_string: &str, max_connections: u32) -> DatabaseResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(connection_string)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(max_connections, "Database connection pool created successfully");

    Ok(pool)
}

/// Run a trivial query to check the pool can still reach the server.
pub async fn is_healthy(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    }
}
