//! The transactional executor and the store-pool seam.
//!
//! The pool is an injected dependency, not a module-level singleton, so
//! tests substitute a fake and production wires in a real adapter. Each
//! request holds one connection for exactly one statement; every exit path
//! releases it because release is the connection's drop.

use crate::error::{DispatchResult, StoreError};
use crate::statement::{BoundStatement, SqlValue};
use async_trait::async_trait;
use std::sync::Arc;

/// A single pooled connection, good for one statement.
///
/// Dropping the connection returns it to its pool. Implementations must not
/// require an explicit release call; the executor relies on drop semantics
/// to guarantee release on success, statement error, and everything between.
#[async_trait]
pub trait StoreConnection: Send {
    /// Executes one parameterized statement, returning rows affected.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreError>;
}

/// A shared connection pool.
///
/// This is the seam to the relational store: implement it over a real pool
/// (see `driftsync_pg`) or over an in-memory fake for tests. `acquire` and
/// `execute` are the only suspension points in the dispatcher.
#[async_trait]
pub trait StorePool: Send + Sync {
    /// Acquires a connection, suspending until one is available or the pool
    /// reports failure.
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, StoreError>;
}

/// Applies bound statements against a store pool, one connection per
/// statement.
pub struct Executor {
    pool: Arc<dyn StorePool>,
}

impl Executor {
    /// Creates an executor over the given pool.
    pub fn new(pool: Arc<dyn StorePool>) -> Self {
        Self { pool }
    }

    /// Executes exactly one statement on a freshly acquired connection.
    ///
    /// The connection drops (and thus releases) when this function returns,
    /// on both the success and the error path. Each statement is its own
    /// implicit transaction; the store's per-statement atomicity is all the
    /// conflict-resolution clause needs.
    pub async fn execute(&self, statement: &BoundStatement) -> DispatchResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let rows = conn.execute(statement.sql, &statement.params).await?;
        Ok(rows)
    }
}

/// A scripted outcome for [`MockPool`].
#[derive(Debug, Clone)]
enum MockOutcome {
    /// Execute succeeds with this many rows affected.
    Rows(u64),
    /// Acquire fails (pool exhausted or backend down).
    AcquireError(String),
    /// Execute fails (store rejection).
    ExecuteError(String),
}

/// Shared state between a mock pool and its vended connections.
#[derive(Default)]
struct MockState {
    outcomes: parking_lot::Mutex<Vec<MockOutcome>>,
    acquires: std::sync::atomic::AtomicUsize,
    releases: std::sync::atomic::AtomicUsize,
    executed: parking_lot::Mutex<Vec<(String, Vec<SqlValue>)>>,
}

/// A mock store pool for testing.
///
/// Outcomes are scripted in FIFO order; with no script, every execute
/// reports one row affected. The pool counts acquires and releases so tests
/// can assert connection hygiene.
#[derive(Default)]
pub struct MockPool {
    state: Arc<MockState>,
}

impl MockPool {
    /// Creates a mock pool where every statement succeeds with one row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next execute to report `rows` affected.
    pub fn push_rows(&self, rows: u64) {
        self.state.outcomes.lock().push(MockOutcome::Rows(rows));
    }

    /// Scripts the next acquire to fail.
    pub fn push_acquire_error(&self, message: impl Into<String>) {
        self.state
            .outcomes
            .lock()
            .push(MockOutcome::AcquireError(message.into()));
    }

    /// Scripts the next execute to fail.
    pub fn push_execute_error(&self, message: impl Into<String>) {
        self.state
            .outcomes
            .lock()
            .push(MockOutcome::ExecuteError(message.into()));
    }

    /// Number of connections handed out.
    pub fn acquires(&self) -> usize {
        self.state.acquires.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of connections returned.
    pub fn releases(&self) -> usize {
        self.state.releases.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Statements executed so far, with their bound values.
    pub fn executed(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.state.executed.lock().clone()
    }

    fn next_outcome(&self) -> Option<MockOutcome> {
        let mut outcomes = self.state.outcomes.lock();
        if outcomes.is_empty() {
            None
        } else {
            Some(outcomes.remove(0))
        }
    }
}

#[async_trait]
impl StorePool for MockPool {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, StoreError> {
        let outcome = self.next_outcome();
        if let Some(MockOutcome::AcquireError(message)) = outcome {
            return Err(StoreError::Pool(message));
        }
        self.state
            .acquires
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            state: Arc::clone(&self.state),
            outcome,
        }))
    }
}

/// The connection type vended by [`MockPool`].
pub struct MockConnection {
    state: Arc<MockState>,
    outcome: Option<MockOutcome>,
}

#[async_trait]
impl StoreConnection for MockConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreError> {
        // Statements are recorded even when they fail, so tests can assert
        // what reached the store.
        self.state
            .executed
            .lock()
            .push((sql.to_string(), params.to_vec()));
        match self.outcome.take() {
            Some(MockOutcome::ExecuteError(message)) => Err(StoreError::Execute(message)),
            Some(MockOutcome::Rows(rows)) => Ok(rows),
            _ => Ok(1),
        }
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.state
            .releases
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
