//! The statement catalog: operation routing and upsert resolution.
//!
//! Routing is a static, total function of `(Table, MutationKind)`. The
//! catalog is built once at startup; unknown pairs answer "no mapping" and
//! the caller reports that as a client error. Table and column identifiers
//! are fixed in the statement text, so nothing client-controlled ever
//! reaches the SQL as an identifier.

use crate::error::{DispatchError, DispatchResult};
use crate::statement::{BoundStatement, SqlValue};
use driftsync_protocol::{
    ChangeEnvelope, DeleteKey, ListRow, MutationKind, Table, TodoCompletion, TodoRow,
};
use std::collections::HashMap;

/// Upsert for `lists`: insert, or overwrite the non-key columns on an
/// identity conflict. Last write in commit order wins.
pub const LISTS_UPSERT_SQL: &str = "INSERT INTO lists(id, created_at, name, owner_id) \
     VALUES ($1, $2, $3, $4) \
     ON CONFLICT (id) DO UPDATE SET created_at = EXCLUDED.created_at, \
     name = EXCLUDED.name, owner_id = EXCLUDED.owner_id";

/// Upsert for `todos`. The conflict arm overwrites only the completion
/// columns; description, creator, and list membership keep their stored
/// values when the row already exists.
pub const TODOS_UPSERT_SQL: &str =
    "INSERT INTO todos(id, completed_at, description, completed, created_by, completed_by, list_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) \
     ON CONFLICT (id) DO UPDATE SET completed_at = EXCLUDED.completed_at, \
     completed = EXCLUDED.completed, completed_by = EXCLUDED.completed_by";

/// Partial update for `todos`: completion status and its metadata only.
pub const TODOS_PARTIAL_SQL: &str =
    "UPDATE todos SET completed = $1, completed_at = $2, completed_by = $3 WHERE id = $4";

/// Delete from `lists` by row identity.
pub const LISTS_DELETE_SQL: &str = "DELETE FROM lists WHERE id = $1";

/// Delete from `todos` by row identity.
pub const TODOS_DELETE_SQL: &str = "DELETE FROM todos WHERE id = $1";

/// A statement template plus the binder that extracts its values from an
/// envelope in `$1..$n` column order.
struct StatementSpec {
    sql: &'static str,
    bind: fn(&ChangeEnvelope) -> DispatchResult<Vec<SqlValue>>,
}

/// The static `(table, operation) -> statement` mapping.
pub struct StatementCatalog {
    entries: HashMap<(Table, MutationKind), StatementSpec>,
}

impl StatementCatalog {
    /// Builds the catalog.
    ///
    /// `lists` has no partial-update entry: the client's partial list
    /// updates carry nothing this endpoint applies, and the absence is
    /// reported to the caller as an invalid request.
    pub fn new() -> Self {
        let mut entries: HashMap<(Table, MutationKind), StatementSpec> = HashMap::new();

        entries.insert(
            (Table::Lists, MutationKind::Upsert),
            StatementSpec {
                sql: LISTS_UPSERT_SQL,
                bind: bind_lists_upsert,
            },
        );
        entries.insert(
            (Table::Todos, MutationKind::Upsert),
            StatementSpec {
                sql: TODOS_UPSERT_SQL,
                bind: bind_todos_upsert,
            },
        );
        entries.insert(
            (Table::Todos, MutationKind::PartialUpdate),
            StatementSpec {
                sql: TODOS_PARTIAL_SQL,
                bind: bind_todos_partial,
            },
        );
        entries.insert(
            (Table::Lists, MutationKind::Delete),
            StatementSpec {
                sql: LISTS_DELETE_SQL,
                bind: bind_delete,
            },
        );
        entries.insert(
            (Table::Todos, MutationKind::Delete),
            StatementSpec {
                sql: TODOS_DELETE_SQL,
                bind: bind_delete,
            },
        );

        Self { entries }
    }

    /// Routes `(table, kind)` to a bound statement.
    ///
    /// Returns `Ok(None)` when no mapping exists; binding failures (missing
    /// `id`, wrong-typed members) surface as invalid-request errors. Routing
    /// itself has no side effects.
    pub fn route(
        &self,
        table: Table,
        kind: MutationKind,
        envelope: &ChangeEnvelope,
    ) -> DispatchResult<Option<BoundStatement>> {
        let Some(spec) = self.entries.get(&(table, kind)) else {
            return Ok(None);
        };
        let params = (spec.bind)(envelope)?;
        Ok(Some(BoundStatement::new(spec.sql, params)))
    }

    /// Returns true if a mapping exists for the pair.
    pub fn has_mapping(&self, table: Table, kind: MutationKind) -> bool {
        self.entries.contains_key(&(table, kind))
    }
}

impl Default for StatementCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn bind_lists_upsert(envelope: &ChangeEnvelope) -> DispatchResult<Vec<SqlValue>> {
    let row: ListRow = envelope.row(Table::Lists)?;
    Ok(vec![
        row.id.into(),
        row.created_at.into(),
        row.name.into(),
        row.owner_id.into(),
    ])
}

fn bind_todos_upsert(envelope: &ChangeEnvelope) -> DispatchResult<Vec<SqlValue>> {
    let row: TodoRow = envelope.row(Table::Todos)?;
    Ok(vec![
        row.id.into(),
        row.completed_at.into(),
        row.description.into(),
        row.completed.into(),
        row.created_by.into(),
        row.completed_by.into(),
        row.list_id.into(),
    ])
}

fn bind_todos_partial(envelope: &ChangeEnvelope) -> DispatchResult<Vec<SqlValue>> {
    let row: TodoCompletion = envelope.row(Table::Todos)?;
    Ok(vec![
        row.completed.into(),
        row.completed_at.into(),
        row.completed_by.into(),
        row.id.into(),
    ])
}

fn bind_delete(envelope: &ChangeEnvelope) -> DispatchResult<Vec<SqlValue>> {
    let table = envelope.table()?;
    let key: DeleteKey = envelope.row(table)?;
    Ok(vec![key.id.into()])
}
