//! Caller-facing mutation responses.

use crate::operation::MutationKind;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// The response shape for a mutation request.
///
/// Every response carries a `message`; success messages name the table and
/// row id affected to aid client-side reconciliation. The `status` field
/// uses HTTP semantics (200 applied, 400 invalid request, 500 store
/// failure) so the embedding layer can forward it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Human-readable outcome description.
    pub message: String,
    /// Rows affected by the statement, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl MutationResponse {
    /// Creates a success response for an applied mutation.
    ///
    /// A partial update that matched no rows still succeeds (the statement
    /// executed), but the message says so: a local-first client replaying
    /// changes against a deleted row needs that signal to reconcile.
    pub fn completed(kind: MutationKind, table: Table, id: &str, rows_affected: u64) -> Self {
        let message = if rows_affected == 0 && kind == MutationKind::PartialUpdate {
            format!("{} matched no rows for {} {}", kind.verb(), table, id)
        } else {
            format!("{} completed for {} {}", kind.verb(), table, id)
        };
        Self {
            status: 200,
            message,
            rows_affected: Some(rows_affected),
        }
    }

    /// Creates an invalid-request response.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
            rows_affected: None,
        }
    }

    /// Creates a store-failure response.
    pub fn store_failure(message: impl Into<String>) -> Self {
        Self {
            status: 500,
            message: message.into(),
            rows_affected: None,
        }
    }

    /// Returns true if the mutation was applied.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Returns true if the request was rejected as malformed.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_message_names_table_and_id() {
        let resp = MutationResponse::completed(MutationKind::Upsert, Table::Lists, "L1", 1);
        assert!(resp.is_success());
        assert_eq!(resp.message, "PUT completed for lists L1");
        assert_eq!(resp.rows_affected, Some(1));
    }

    #[test]
    fn zero_row_partial_update_is_reported() {
        let resp =
            MutationResponse::completed(MutationKind::PartialUpdate, Table::Todos, "T1", 0);
        assert!(resp.is_success());
        assert_eq!(resp.message, "PATCH matched no rows for todos T1");
        assert_eq!(resp.rows_affected, Some(0));
    }

    #[test]
    fn zero_row_delete_keeps_plain_message() {
        let resp = MutationResponse::completed(MutationKind::Delete, Table::Todos, "T1", 0);
        assert_eq!(resp.message, "DELETE completed for todos T1");
    }

    #[test]
    fn invalid_and_failure_statuses() {
        assert_eq!(MutationResponse::invalid("bad").status, 400);
        assert!(MutationResponse::invalid("bad").is_client_error());
        assert_eq!(MutationResponse::store_failure("down").status, 500);
    }

    #[test]
    fn rows_affected_omitted_from_error_json() {
        let json =
            serde_json::to_string(&MutationResponse::invalid("Invalid body provided")).unwrap();
        assert!(!json.contains("rows_affected"));
    }
}
