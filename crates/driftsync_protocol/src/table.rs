//! Table identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table known to the mutation endpoint.
///
/// The set is closed: clients may only mutate tables listed here, and the
/// statement catalog is keyed on these identifiers. Extending the endpoint
/// to a new collection means adding a variant plus its catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    /// Todo lists.
    Lists,
    /// Todo items, each referencing a list via `list_id`.
    Todos,
}

impl Table {
    /// All known tables.
    pub const ALL: [Table; 2] = [Table::Lists, Table::Todos];

    /// Returns the SQL identifier for this table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Lists => "lists",
            Table::Todos => "todos",
        }
    }

    /// Parses a client-supplied table name.
    ///
    /// Returns `None` for anything outside the known set; the caller must
    /// treat that as a malformed request, never as a routing fallthrough.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "lists" => Some(Table::Lists),
            "todos" => Some(Table::Todos),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
