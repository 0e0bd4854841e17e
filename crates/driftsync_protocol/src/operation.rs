//! Mutation kinds.

use std::fmt;

/// The kind of mutation a change envelope requests.
///
/// The kind comes from the caller's intent (the HTTP verb at the outer
/// layer); it is never stored alongside the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Create the row, or replace the mapped columns if the identity exists.
    Upsert,
    /// Update only an enumerated subset of columns.
    PartialUpdate,
    /// Remove the row by identity.
    Delete,
}

impl MutationKind {
    /// Returns the wire verb used in response messages.
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Upsert => "PUT",
            MutationKind::PartialUpdate => "PATCH",
            MutationKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}
