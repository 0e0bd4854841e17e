//! Property tests for routing and binding over the whole input space.

use driftsync_dispatch::StatementCatalog;
use driftsync_protocol::{MutationKind, Table};
use driftsync_testkit::prelude::*;
use proptest::prelude::*;

const KINDS: [MutationKind; 3] = [
    MutationKind::Upsert,
    MutationKind::PartialUpdate,
    MutationKind::Delete,
];

/// Counts the distinct `$n` placeholders in a statement.
fn placeholder_count(sql: &str) -> usize {
    (1..)
        .take_while(|n| sql.contains(&format!("${}", n)))
        .count()
}

proptest! {
    #[test]
    fn routing_never_panics(envelope in envelope_strategy()) {
        let catalog = StatementCatalog::new();
        if let Some(table) = Table::parse(&envelope.table) {
            for kind in KINDS {
                // Ok(bound), Ok(None), or a validation error; never a panic.
                let _ = catalog.route(table, kind, &envelope);
            }
        }
    }

    #[test]
    fn unknown_tables_never_route(envelope in envelope_strategy()) {
        prop_assume!(Table::parse(&envelope.table).is_none());
        // The table set is closed; nothing outside it can reach a statement.
        prop_assert!(envelope.table().is_err());
    }

    #[test]
    fn bound_params_match_placeholders(envelope in envelope_strategy()) {
        let catalog = StatementCatalog::new();
        let Some(table) = Table::parse(&envelope.table) else { return Ok(()); };
        for kind in KINDS {
            if let Ok(Some(bound)) = catalog.route(table, kind, &envelope) {
                prop_assert_eq!(bound.params.len(), placeholder_count(bound.sql));
            }
        }
    }

    #[test]
    fn routed_statements_bind_id(envelope in envelope_strategy()) {
        let catalog = StatementCatalog::new();
        let Some(table) = Table::parse(&envelope.table) else { return Ok(()); };
        let id = envelope.row_id().map(str::to_string);
        for kind in KINDS {
            if let Ok(Some(bound)) = catalog.route(table, kind, &envelope) {
                // Every statement is keyed by the row identity.
                let id = id.clone().expect("routed envelope must carry an id");
                prop_assert!(bound
                    .params
                    .iter()
                    .any(|p| *p == driftsync_dispatch::SqlValue::text(id.clone())));
            }
        }
    }
}
