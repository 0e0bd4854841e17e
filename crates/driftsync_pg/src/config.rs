//! PostgreSQL pool configuration.

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use driftsync_dispatch::StoreError;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Configuration for the PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub dbname: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Maximum pool size.
    pub pool_size: usize,
    /// Wait timeout when the pool is exhausted.
    pub wait_timeout: Duration,
}

impl PgConfig {
    /// Creates a configuration with defaults for local development.
    pub fn new() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "driftsync".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            pool_size: 16,
            wait_timeout: Duration::from_secs(30),
        }
    }

    /// Loads configuration from `DRIFTSYNC_DB_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            host: std::env::var("DRIFTSYNC_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("DRIFTSYNC_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("DRIFTSYNC_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("DRIFTSYNC_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("DRIFTSYNC_DB_PASSWORD").unwrap_or(defaults.password),
            pool_size: std::env::var("DRIFTSYNC_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pool_size),
            wait_timeout: std::env::var("DRIFTSYNC_DB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.wait_timeout),
        }
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the database name.
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    /// Sets the credentials.
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Sets the maximum pool size.
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Creates a connection pool from this configuration.
    ///
    /// Connections are recycled with a fast liveness check; broken
    /// connections found during recycling are discarded and replaced
    /// without affecting in-flight requests.
    pub fn create_pool(&self) -> Result<Pool, StoreError> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = cfg.get_pool_config();
        pool_cfg.max_size = self.pool_size;
        pool_cfg.timeouts.wait = Some(self.wait_timeout);
        cfg.pool = Some(pool_cfg);

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StoreError::Pool(format!("failed to create pool: {}", e)))
    }
}

impl Default for PgConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PgConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.pool_size, 16);
    }

    #[test]
    fn config_builder() {
        let config = PgConfig::new()
            .with_host("db.internal")
            .with_dbname("todos")
            .with_credentials("sync", "secret")
            .with_pool_size(4);

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.dbname, "todos");
        assert_eq!(config.user, "sync");
        assert_eq!(config.pool_size, 4);
    }
}
