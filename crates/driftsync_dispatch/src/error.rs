//! Error types for the mutation dispatcher.

use driftsync_protocol::{EnvelopeError, MutationKind};
use thiserror::Error;

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced by the store layer.
///
/// Kept separate from [`DispatchError`] so pool adapters only ever speak in
/// store terms; the dispatcher folds these into its own taxonomy.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The pool could not provide a connection (exhaustion, backend down).
    #[error("connection pool error: {0}")]
    Pool(String),

    /// The store rejected the statement (constraint violation, connectivity
    /// loss mid-execute).
    #[error("statement execution failed: {0}")]
    Execute(String),
}

/// Errors that can occur while dispatching a mutation.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The envelope was missing, malformed, or failed row validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The named table is outside the known set.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// No statement is mapped for this table/operation pair.
    #[error("no {kind} mapping for table {table}")]
    NoMapping {
        /// The requested table.
        table: &'static str,
        /// The requested mutation kind.
        kind: MutationKind,
    },

    /// The connection pool failed to provide a connection.
    #[error("pool error: {0}")]
    Pool(String),

    /// The store rejected the statement.
    #[error("store error: {0}")]
    Store(String),
}

impl DispatchError {
    /// Returns true if this is a client error (4xx): detected before any
    /// store interaction, never retried server-side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidRequest(_)
                | DispatchError::UnknownTable(_)
                | DispatchError::NoMapping { .. }
        )
    }

    /// Returns true if this is a store failure (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, DispatchError::Pool(_) | DispatchError::Store(_))
    }
}

impl From<EnvelopeError> for DispatchError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::UnknownTable(name) => DispatchError::UnknownTable(name),
            other => DispatchError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Pool(message) => DispatchError::Pool(message),
            StoreError::Execute(message) => DispatchError::Store(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(DispatchError::InvalidRequest("bad".into()).is_client_error());
        assert!(DispatchError::UnknownTable("users".into()).is_client_error());
        assert!(DispatchError::NoMapping {
            table: "lists",
            kind: MutationKind::PartialUpdate,
        }
        .is_client_error());
        assert!(DispatchError::Pool("exhausted".into()).is_server_error());
        assert!(DispatchError::Store("constraint".into()).is_server_error());
        assert!(!DispatchError::Store("constraint".into()).is_client_error());
    }

    #[test]
    fn store_error_folding() {
        let err: DispatchError = StoreError::Pool("timed out".into()).into();
        assert!(matches!(err, DispatchError::Pool(_)));
        let err: DispatchError = StoreError::Execute("bad column".into()).into();
        assert!(matches!(err, DispatchError::Store(_)));
    }

    #[test]
    fn envelope_errors_become_invalid_request() {
        let err: DispatchError = EnvelopeError::MissingId.into();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("missing row id"));
    }

    #[test]
    fn unknown_table_keeps_its_kind() {
        let err: DispatchError = EnvelopeError::UnknownTable("users".into()).into();
        assert!(matches!(err, DispatchError::UnknownTable(_)));
    }
}
