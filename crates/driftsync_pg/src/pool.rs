//! The production store pool over `deadpool-postgres`.

use crate::config::PgConfig;
use async_trait::async_trait;
use deadpool_postgres::{Object, Pool, PoolError};
use driftsync_dispatch::{SqlValue, StoreConnection, StoreError, StorePool};
use tokio_postgres::types::ToSql;
use tracing::warn;

/// A PostgreSQL-backed store pool.
///
/// Wraps a shared `deadpool-postgres` pool behind the dispatcher's
/// [`StorePool`] seam. One pool serves the whole process; each request
/// borrows one connection for one statement and returns it on drop.
#[derive(Clone)]
pub struct PgStorePool {
    pool: Pool,
}

impl PgStorePool {
    /// Creates a store pool from an existing deadpool pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates a store pool from configuration.
    pub fn from_config(config: &PgConfig) -> Result<Self, StoreError> {
        Ok(Self::new(config.create_pool()?))
    }

    /// Current number of connections in the pool, for observability.
    pub fn size(&self) -> usize {
        self.pool.status().size
    }

    /// Number of idle connections available without waiting.
    pub fn available(&self) -> usize {
        self.pool.status().available
    }
}

#[async_trait]
impl StorePool for PgStorePool {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, StoreError> {
        match self.pool.get().await {
            Ok(client) => Ok(Box::new(PgStoreConnection { client })),
            Err(PoolError::Backend(e)) => {
                // A connection broke underneath the pool. That is a pool
                // diagnostic, not a fault in the caller's request; the pool
                // keeps serving and the request reports a store failure.
                warn!(error = %e, "postgres connection failure in pool");
                Err(StoreError::Pool(e.to_string()))
            }
            Err(e) => Err(StoreError::Pool(e.to_string())),
        }
    }
}

/// A pooled PostgreSQL connection, good for one statement.
pub struct PgStoreConnection {
    client: Object,
}

#[async_trait]
impl StoreConnection for PgStoreConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreError> {
        let bound = pg_params(params);
        self.client
            .execute(sql, &bound)
            .await
            .map_err(|e| StoreError::Execute(e.to_string()))
    }
}

/// Borrows dispatcher values as typed postgres parameters.
///
/// `SqlValue` NULLs stay typed (`Option<String>` / `Option<bool>`), so the
/// wire type always matches what the prepared statement expects.
fn pg_params(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values
        .iter()
        .map(|value| match value {
            SqlValue::Text(opt) => opt as &(dyn ToSql + Sync),
            SqlValue::Bool(opt) => opt as &(dyn ToSql + Sync),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_preserve_arity_and_nulls() {
        let values = vec![
            SqlValue::text("T1"),
            SqlValue::Text(None),
            SqlValue::Bool(Some(true)),
            SqlValue::Bool(None),
        ];
        let bound = pg_params(&values);
        assert_eq!(bound.len(), 4);
    }
}
