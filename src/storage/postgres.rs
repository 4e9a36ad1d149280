//! PostgreSQL-backed key-value store
//!
//! One `kv_entries` row per (namespace, key). Provides:
//! - Configurable pool sizes and timeouts
//! - Health checking
//! - Upsert writes so `set` is a whole-value overwrite

use super::{KeyValueStore, Scope};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Key-value store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    owner: String,
}

impl PgStore {
    /// Connect, verify the connection and bind the store to `owner`
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig, owner: &str) -> Result<Self> {
        let pool = create_pool(config).await?;
        Ok(Self::from_pool(pool, owner))
    }

    pub fn from_pool(pool: PgPool, owner: &str) -> Self {
        Self {
            pool,
            owner: owner.to_string(),
        }
    }

    /// Get reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("health_check", e))?;
        Ok(())
    }

    /// Close all connections gracefully
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    #[instrument(skip(self))]
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM kv_entries WHERE namespace = $1 AND key = $2")
                .bind(scope.namespace(&self.owner))
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| read_error(key, e))?;

        Ok(row.map(|(value,)| value))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (namespace, key, value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(scope.namespace(&self.owner))
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::StorageWrite {
            key: key.to_string().into(),
            message: e.to_string().into(),
            source: Some(Box::new(e)),
        })?;

        Ok(())
    }
}

fn read_error(key: &str, err: sqlx::Error) -> Error {
    Error::StorageRead {
        key: key.to_string().into(),
        message: err.to_string().into(),
        source: Some(Box::new(err)),
    }
}

/// Create a connection pool with the given configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("Creating database connection pool...");
    debug!(
        "Pool config: max={}, min={}, connect_timeout={:?}",
        config.max_connections, config.min_connections, config.connect_timeout
    );

    let mut connect_options = PgConnectOptions::from_str(&config.url).map_err(|e| Error::Config {
        message: format!("Invalid database URL: {}", e).into(),
        source: None,
    })?;

    connect_options = connect_options.log_statements(log::LevelFilter::Debug);
    connect_options =
        connect_options.log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(1));

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .connect_with(connect_options)
        .await
        .map_err(|e| Error::Config {
            message: format!("Failed to create connection pool: {}", e).into(),
            source: Some(Box::new(e)),
        })?;

    info!(
        "Database connection pool created (size: {}, idle: {})",
        pool.size(),
        pool.num_idle()
    );

    Ok(pool)
}

/// Run database migrations
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Migration(e.to_string()))?;

    info!("Database migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Option<DatabaseConfig> {
        // Requires a running database; skipped without one
        let url = std::env::var("DATABASE_URL").ok()?;
        Some(DatabaseConfig {
            url,
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        })
    }

    #[tokio::test]
    async fn test_round_trip() {
        let Some(config) = test_config() else {
            return;
        };

        let owner = format!("test-{}", uuid::Uuid::new_v4());
        let store = PgStore::connect(&config, &owner).await.unwrap();
        run_migrations(store.pool()).await.unwrap();
        store.health_check().await.unwrap();

        assert_eq!(store.get(Scope::User, "remix_user_profile").await.unwrap(), None);

        store.set(Scope::User, "remix_user_profile", "{\"a\":1}").await.unwrap();
        store.set(Scope::User, "remix_user_profile", "{\"a\":2}").await.unwrap();
        assert_eq!(
            store.get(Scope::User, "remix_user_profile").await.unwrap(),
            Some("{\"a\":2}".to_string())
        );

        let other = PgStore::from_pool(store.pool().clone(), "someone-else");
        assert_eq!(other.get(Scope::User, "remix_user_profile").await.unwrap(), None);

        store.close().await;
    }
}
