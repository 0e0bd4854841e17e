//! Property-based test generators using proptest.
//!
//! Strategies generate both well-formed envelopes and adversarial ones
//! (unknown tables, missing ids, wrong-typed members) so routing and
//! validation properties can be checked over the whole input space.

use driftsync_protocol::ChangeEnvelope;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for table names: known tables plus arbitrary identifiers.
pub fn table_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("lists".to_string()),
        3 => Just("todos".to_string()),
        2 => prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex"),
    ]
}

/// Strategy for row identities.
pub fn row_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9-]{1,36}").expect("Invalid regex")
}

/// Strategy for optional text columns.
fn opt_text_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => prop::string::string_regex("[ -~]{0,32}")
            .expect("Invalid regex")
            .prop_map(Value::String),
        1 => Just(Value::Null),
    ]
}

/// Strategy for well-formed `lists` row payloads.
pub fn list_row_strategy() -> impl Strategy<Value = Value> {
    (row_id_strategy(), opt_text_strategy(), opt_text_strategy(), opt_text_strategy()).prop_map(
        |(id, created_at, name, owner_id)| {
            json!({
                "id": id,
                "created_at": created_at,
                "name": name,
                "owner_id": owner_id
            })
        },
    )
}

/// Strategy for well-formed `todos` row payloads.
pub fn todo_row_strategy() -> impl Strategy<Value = Value> {
    (
        row_id_strategy(),
        opt_text_strategy(),
        any::<Option<bool>>(),
        opt_text_strategy(),
        opt_text_strategy(),
    )
        .prop_map(|(id, description, completed, created_by, list_id)| {
            json!({
                "id": id,
                "description": description,
                "completed": completed,
                "created_by": created_by,
                "list_id": list_id
            })
        })
}

/// Strategy for arbitrary row payloads, valid or not.
pub fn any_row_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => list_row_strategy(),
        3 => todo_row_strategy(),
        1 => Just(json!({})),
        1 => Just(Value::Null),
        1 => row_id_strategy().prop_map(|id| json!({ "id": id })),
    ]
}

/// Strategy for change envelopes across the whole input space.
pub fn envelope_strategy() -> impl Strategy<Value = ChangeEnvelope> {
    (table_name_strategy(), any_row_strategy())
        .prop_map(|(table, data)| ChangeEnvelope::new(table, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn list_rows_always_carry_id(row in list_row_strategy()) {
            prop_assert!(row.get("id").and_then(Value::as_str).is_some());
        }

        #[test]
        fn envelopes_roundtrip_through_json(envelope in envelope_strategy()) {
            let decoded = ChangeEnvelope::from_json(&envelope.to_json()).unwrap();
            prop_assert_eq!(decoded.table, envelope.table);
            prop_assert_eq!(decoded.data, envelope.data);
        }
    }
}
