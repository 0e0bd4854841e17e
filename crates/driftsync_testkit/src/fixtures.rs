//! Envelope builders and server fixtures.

use crate::memory::MemoryStore;
use driftsync_dispatch::{DispatcherConfig, MutationServer};
use driftsync_protocol::ChangeEnvelope;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Initializes test logging from `RUST_LOG`, once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Generates a fresh client-style row identity.
pub fn row_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a full `lists` upsert envelope for the given id.
pub fn list_envelope(id: &str) -> ChangeEnvelope {
    ChangeEnvelope::new(
        "lists",
        json!({
            "id": id,
            "created_at": "2024-01-01T00:00:00Z",
            "name": "Groceries",
            "owner_id": "U1"
        }),
    )
}

/// Builds a full `todos` upsert envelope for the given id and list.
pub fn todo_envelope(id: &str, list_id: &str) -> ChangeEnvelope {
    ChangeEnvelope::new(
        "todos",
        json!({
            "id": id,
            "completed_at": null,
            "description": "Milk",
            "completed": false,
            "created_by": "U1",
            "completed_by": null,
            "list_id": list_id
        }),
    )
}

/// Builds a `todos` partial-update envelope marking the row completed.
pub fn completion_envelope(id: &str) -> ChangeEnvelope {
    ChangeEnvelope::new(
        "todos",
        json!({
            "id": id,
            "completed": true,
            "completed_at": "2024-02-01T00:00:00Z",
            "completed_by": "U1"
        }),
    )
}

/// Builds a delete envelope for the given table and id.
pub fn delete_envelope(table: &str, id: &str) -> ChangeEnvelope {
    ChangeEnvelope::new(table, json!({ "id": id }))
}

/// Creates a mutation server wired to a fresh in-memory store.
///
/// Returns the store handle alongside the server so tests can assert on
/// table contents and connection hygiene directly.
pub fn memory_server() -> (MutationServer, MemoryStore) {
    let store = MemoryStore::new();
    let server = MutationServer::new(DispatcherConfig::default(), Arc::new(store.clone()));
    (server, store)
}
