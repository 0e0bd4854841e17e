//! Change envelopes.

use crate::table::Table;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding or validating a change envelope.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The body was absent or not a valid envelope.
    #[error("invalid body: {0}")]
    Malformed(String),

    /// The named table is outside the known set.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// The `data` member did not validate against the target row shape.
    #[error("invalid row for {table}: {message}")]
    InvalidRow {
        /// The table the row was destined for.
        table: &'static str,
        /// What failed to validate.
        message: String,
    },

    /// The `data` member is missing its `id`.
    #[error("missing row id")]
    MissingId,
}

/// The `{table, data}` unit of work sent by a sync client.
///
/// The envelope is the loosely-typed wire form: `table` is an arbitrary
/// string and `data` an arbitrary JSON value. Validation into a typed row
/// happens via [`ChangeEnvelope::row`] before any store interaction, so a
/// malformed payload is caught with no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEnvelope {
    /// Target table name as sent by the client.
    pub table: String,
    /// Row payload, one column-name/value mapping.
    pub data: Value,
}

impl ChangeEnvelope {
    /// Creates an envelope from parts.
    pub fn new(table: impl Into<String>, data: Value) -> Self {
        Self {
            table: table.into(),
            data,
        }
    }

    /// Decodes an envelope from a JSON body.
    ///
    /// An empty body is rejected up front, matching the "missing body"
    /// client error of the outer surface.
    pub fn from_json(body: &[u8]) -> Result<Self, EnvelopeError> {
        if body.is_empty() {
            return Err(EnvelopeError::Malformed("empty body".into()));
        }
        serde_json::from_slice(body).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    /// Encodes the envelope back to JSON.
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Resolves the table name against the known set.
    pub fn table(&self) -> Result<Table, EnvelopeError> {
        Table::parse(&self.table).ok_or_else(|| EnvelopeError::UnknownTable(self.table.clone()))
    }

    /// Returns the row identity, if present and a string.
    pub fn row_id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }

    /// Validates `data` into a typed row for the given table.
    ///
    /// The row identity is checked for presence and non-emptiness first, so
    /// "missing id" is reported as such rather than as a shape mismatch.
    pub fn row<R: DeserializeOwned>(&self, table: Table) -> Result<R, EnvelopeError> {
        match self.row_id() {
            Some(id) if !id.is_empty() => {}
            _ => return Err(EnvelopeError::MissingId),
        }
        serde_json::from_value(self.data.clone()).map_err(|e| EnvelopeError::InvalidRow {
            table: table.as_str(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{DeleteKey, ListRow, TodoCompletion};
    use serde_json::json;

    fn lists_envelope() -> ChangeEnvelope {
        ChangeEnvelope::new(
            "lists",
            json!({
                "id": "L1",
                "created_at": "2024-01-01",
                "name": "Groceries",
                "owner_id": "U1"
            }),
        )
    }

    #[test]
    fn decode_roundtrip() {
        let envelope = lists_envelope();
        let decoded = ChangeEnvelope::from_json(&envelope.to_json()).unwrap();
        assert_eq!(decoded.table, "lists");
        assert_eq!(decoded.row_id(), Some("L1"));
    }

    #[test]
    fn empty_body_rejected() {
        assert!(matches!(
            ChangeEnvelope::from_json(b""),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn garbage_body_rejected() {
        assert!(matches!(
            ChangeEnvelope::from_json(b"not json"),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_table_rejected() {
        let envelope = ChangeEnvelope::new("users", json!({ "id": "U1" }));
        assert!(matches!(
            envelope.table(),
            Err(EnvelopeError::UnknownTable(_))
        ));
    }

    #[test]
    fn typed_row_extraction() {
        let envelope = lists_envelope();
        let row: ListRow = envelope.row(Table::Lists).unwrap();
        assert_eq!(row.owner_id.as_deref(), Some("U1"));
    }

    #[test]
    fn missing_id_reported_before_shape() {
        let envelope = ChangeEnvelope::new("todos", json!({ "completed": true }));
        let result: Result<TodoCompletion, _> = envelope.row(Table::Todos);
        assert!(matches!(result, Err(EnvelopeError::MissingId)));
    }

    #[test]
    fn empty_id_rejected() {
        let envelope = ChangeEnvelope::new("todos", json!({ "id": "" }));
        let result: Result<DeleteKey, _> = envelope.row(Table::Todos);
        assert!(matches!(result, Err(EnvelopeError::MissingId)));
    }

    #[test]
    fn wrong_shape_reported_with_table() {
        let envelope = ChangeEnvelope::new("todos", json!({ "id": "T1", "completed": "yes" }));
        let result: Result<TodoCompletion, _> = envelope.row(Table::Todos);
        match result {
            Err(EnvelopeError::InvalidRow { table, .. }) => assert_eq!(table, "todos"),
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }
}
