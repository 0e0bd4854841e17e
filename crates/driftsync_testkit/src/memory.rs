//! An in-memory store that speaks the dispatcher's statement catalog.
//!
//! The store recognizes the catalog's fixed statements by their SQL text
//! and applies their semantics to in-memory tables. That keeps upsert
//! idempotence, conflict-arm behavior, and partial-update isolation
//! testable without a running PostgreSQL.

use async_trait::async_trait;
use driftsync_dispatch::{
    SqlValue, StoreConnection, StoreError, StorePool, LISTS_DELETE_SQL, LISTS_UPSERT_SQL,
    TODOS_DELETE_SQL, TODOS_PARTIAL_SQL, TODOS_UPSERT_SQL,
};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Row = Map<String, Value>;

#[derive(Default)]
struct MemoryState {
    lists: RwLock<HashMap<String, Row>>,
    todos: RwLock<HashMap<String, Row>>,
    acquires: AtomicUsize,
    releases: AtomicUsize,
}

/// An in-memory stand-in for the relational store.
///
/// Implements [`StorePool`]; clones share the same tables, so a test can
/// keep one handle for assertions while the server holds another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored `lists` row, if any.
    pub fn list(&self, id: &str) -> Option<Value> {
        self.state.lists.read().get(id).cloned().map(Value::Object)
    }

    /// Returns the stored `todos` row, if any.
    pub fn todo(&self, id: &str) -> Option<Value> {
        self.state.todos.read().get(id).cloned().map(Value::Object)
    }

    /// Number of `lists` rows.
    pub fn lists_len(&self) -> usize {
        self.state.lists.read().len()
    }

    /// Number of `todos` rows.
    pub fn todos_len(&self) -> usize {
        self.state.todos.read().len()
    }

    /// Number of connections handed out.
    pub fn acquires(&self) -> usize {
        self.state.acquires.load(Ordering::SeqCst)
    }

    /// Number of connections returned.
    pub fn releases(&self) -> usize {
        self.state.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorePool for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, StoreError> {
        self.state.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

/// The connection type vended by [`MemoryStore`].
pub struct MemoryConnection {
    state: Arc<MemoryState>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.state.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreError> {
        if sql == LISTS_UPSERT_SQL {
            return lists_upsert(&self.state, params);
        }
        if sql == TODOS_UPSERT_SQL {
            return todos_upsert(&self.state, params);
        }
        if sql == TODOS_PARTIAL_SQL {
            return todos_partial(&self.state, params);
        }
        if sql == LISTS_DELETE_SQL {
            let id = text_param(params, 0)?;
            return Ok(u64::from(self.state.lists.write().remove(&id).is_some()));
        }
        if sql == TODOS_DELETE_SQL {
            let id = text_param(params, 0)?;
            return Ok(u64::from(self.state.todos.write().remove(&id).is_some()));
        }
        Err(StoreError::Execute(format!(
            "unrecognized statement: {}",
            sql
        )))
    }
}

fn lists_upsert(state: &MemoryState, params: &[SqlValue]) -> Result<u64, StoreError> {
    let id = text_param(params, 0)?;
    let mut row = Row::new();
    row.insert("id".into(), Value::String(id.clone()));
    row.insert("created_at".into(), json_param(params, 1)?);
    row.insert("name".into(), json_param(params, 2)?);
    row.insert("owner_id".into(), json_param(params, 3)?);
    // The conflict arm overwrites every non-key column, so insert and
    // replace collapse into the same write.
    state.lists.write().insert(id, row);
    Ok(1)
}

fn todos_upsert(state: &MemoryState, params: &[SqlValue]) -> Result<u64, StoreError> {
    let id = text_param(params, 0)?;
    let mut todos = state.todos.write();
    if let Some(existing) = todos.get_mut(&id) {
        // Conflict arm: only the completion columns are overwritten.
        existing.insert("completed_at".into(), json_param(params, 1)?);
        existing.insert("completed".into(), json_param(params, 3)?);
        existing.insert("completed_by".into(), json_param(params, 5)?);
    } else {
        let mut row = Row::new();
        row.insert("id".into(), Value::String(id.clone()));
        row.insert("completed_at".into(), json_param(params, 1)?);
        row.insert("description".into(), json_param(params, 2)?);
        row.insert("completed".into(), json_param(params, 3)?);
        row.insert("created_by".into(), json_param(params, 4)?);
        row.insert("completed_by".into(), json_param(params, 5)?);
        row.insert("list_id".into(), json_param(params, 6)?);
        todos.insert(id, row);
    }
    Ok(1)
}

fn todos_partial(state: &MemoryState, params: &[SqlValue]) -> Result<u64, StoreError> {
    let id = text_param(params, 3)?;
    let mut todos = state.todos.write();
    match todos.get_mut(&id) {
        Some(existing) => {
            existing.insert("completed".into(), json_param(params, 0)?);
            existing.insert("completed_at".into(), json_param(params, 1)?);
            existing.insert("completed_by".into(), json_param(params, 2)?);
            Ok(1)
        }
        None => Ok(0),
    }
}

fn param(params: &[SqlValue], index: usize) -> Result<&SqlValue, StoreError> {
    params.get(index).ok_or_else(|| {
        StoreError::Execute(format!("missing parameter ${}", index + 1))
    })
}

fn text_param(params: &[SqlValue], index: usize) -> Result<String, StoreError> {
    match param(params, index)? {
        SqlValue::Text(Some(s)) => Ok(s.clone()),
        other => Err(StoreError::Execute(format!(
            "parameter ${} must be non-null text, got {}",
            index + 1,
            other
        ))),
    }
}

fn json_param(params: &[SqlValue], index: usize) -> Result<Value, StoreError> {
    Ok(match param(params, index)? {
        SqlValue::Text(Some(s)) => Value::String(s.clone()),
        SqlValue::Bool(Some(b)) => Value::Bool(*b),
        SqlValue::Text(None) | SqlValue::Bool(None) => Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn execute(store: &MemoryStore, sql: &'static str, params: Vec<SqlValue>) -> u64 {
        let mut conn = store.acquire().await.unwrap();
        conn.execute(sql, &params).await.unwrap()
    }

    fn list_params(id: &str, name: &str) -> Vec<SqlValue> {
        vec![
            SqlValue::text(id),
            SqlValue::text("2024-01-01"),
            SqlValue::text(name),
            SqlValue::text("U1"),
        ]
    }

    #[tokio::test]
    async fn lists_upsert_inserts_and_replaces() {
        let store = MemoryStore::new();

        execute(&store, LISTS_UPSERT_SQL, list_params("L1", "Groceries")).await;
        assert_eq!(store.lists_len(), 1);

        execute(&store, LISTS_UPSERT_SQL, list_params("L1", "Errands")).await;
        assert_eq!(store.lists_len(), 1);
        assert_eq!(store.list("L1").unwrap()["name"], "Errands");
    }

    #[tokio::test]
    async fn todos_upsert_conflict_arm_keeps_description() {
        let store = MemoryStore::new();
        let first = vec![
            SqlValue::text("T1"),
            SqlValue::Text(None),
            SqlValue::text("Milk"),
            SqlValue::Bool(Some(false)),
            SqlValue::text("U1"),
            SqlValue::Text(None),
            SqlValue::text("L1"),
        ];
        let second = vec![
            SqlValue::text("T1"),
            SqlValue::text("2024-02-01"),
            SqlValue::text("Bread"),
            SqlValue::Bool(Some(true)),
            SqlValue::text("U2"),
            SqlValue::text("U2"),
            SqlValue::text("L2"),
        ];

        execute(&store, TODOS_UPSERT_SQL, first).await;
        execute(&store, TODOS_UPSERT_SQL, second).await;

        let row = store.todo("T1").unwrap();
        // Completion columns replaced, everything else kept.
        assert_eq!(row["completed"], true);
        assert_eq!(row["completed_at"], "2024-02-01");
        assert_eq!(row["completed_by"], "U2");
        assert_eq!(row["description"], "Milk");
        assert_eq!(row["created_by"], "U1");
        assert_eq!(row["list_id"], "L1");
    }

    #[tokio::test]
    async fn partial_update_missing_row_affects_zero() {
        let store = MemoryStore::new();
        let params = vec![
            SqlValue::Bool(Some(true)),
            SqlValue::Text(None),
            SqlValue::Text(None),
            SqlValue::text("T404"),
        ];
        let rows = execute(&store, TODOS_PARTIAL_SQL, params).await;
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_reports_rows_affected() {
        let store = MemoryStore::new();
        execute(&store, LISTS_UPSERT_SQL, list_params("L1", "Groceries")).await;

        let rows = execute(&store, LISTS_DELETE_SQL, vec![SqlValue::text("L1")]).await;
        assert_eq!(rows, 1);
        let rows = execute(&store, LISTS_DELETE_SQL, vec![SqlValue::text("L1")]).await;
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn unrecognized_statement_is_execute_error() {
        let store = MemoryStore::new();
        let mut conn = store.acquire().await.unwrap();
        let err = conn.execute("SELECT 1", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Execute(_)));
    }

    #[tokio::test]
    async fn connections_release_on_drop() {
        let store = MemoryStore::new();
        execute(&store, LISTS_UPSERT_SQL, list_params("L1", "Groceries")).await;
        assert_eq!(store.acquires(), 1);
        assert_eq!(store.releases(), 1);
    }
}
