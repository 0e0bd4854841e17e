//! Typed row payloads.
//!
//! Row identity (`id`) is client-generated and immutable once created; every
//! other column is optional on the wire and maps to SQL `NULL` when absent.

use serde::{Deserialize, Serialize};

/// A row in the `lists` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    /// Client-generated row identity.
    pub id: String,
    /// Creation timestamp, client-authored ISO-8601 text.
    pub created_at: Option<String>,
    /// Display name of the list.
    pub name: Option<String>,
    /// Identity of the owning user.
    pub owner_id: Option<String>,
}

/// A row in the `todos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRow {
    /// Client-generated row identity.
    pub id: String,
    /// Completion timestamp, client-authored ISO-8601 text.
    pub completed_at: Option<String>,
    /// Todo text.
    pub description: Option<String>,
    /// Whether the todo is completed.
    pub completed: Option<bool>,
    /// Identity of the creating user.
    pub created_by: Option<String>,
    /// Identity of the completing user.
    pub completed_by: Option<String>,
    /// The list this todo belongs to.
    pub list_id: Option<String>,
}

/// The partial-update payload for `todos`: completion status and its
/// metadata, nothing else.
///
/// Kept deliberately narrower than [`TodoRow`] so a partial client update
/// cannot clobber columns it does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoCompletion {
    /// Client-generated row identity.
    pub id: String,
    /// Whether the todo is completed.
    pub completed: bool,
    /// Completion timestamp, client-authored ISO-8601 text.
    pub completed_at: Option<String>,
    /// Identity of the completing user.
    pub completed_by: Option<String>,
}

/// The payload for a delete: row identity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteKey {
    /// Client-generated row identity.
    pub id: String,
}
