//! PostgreSQL adapters built on a shared sqlx pool.

mod subscription_store;

pub use subscription_store::PostgresSubscriptionStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::ports::StoreError;

/// Builds the shared connection pool, running migrations when configured.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| StoreError::database(format!("connect: {}", e)))?;

    if config.run_migrations {
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::database(format!("migrate: {}", e)))?;
    }

    Ok(pool)
}
