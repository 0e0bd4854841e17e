//! Request handlers for mutation envelopes.

use crate::catalog::StatementCatalog;
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::executor::{Executor, StorePool};
use driftsync_protocol::{ChangeEnvelope, MutationKind, Table};
use std::sync::Arc;
use tracing::debug;

/// Context for request handling.
pub struct HandlerContext {
    /// Dispatcher configuration.
    pub config: DispatcherConfig,
    /// The statement catalog (shared across all handlers).
    pub catalog: StatementCatalog,
    /// The executor over the injected store pool.
    pub executor: Executor,
}

impl HandlerContext {
    /// Creates a new handler context over the given pool.
    pub fn new(config: DispatcherConfig, pool: Arc<dyn StorePool>) -> Self {
        Self {
            config,
            catalog: StatementCatalog::new(),
            executor: Executor::new(pool),
        }
    }
}

/// The result of an applied mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The mutated table.
    pub table: Table,
    /// The mutation kind.
    pub kind: MutationKind,
    /// The row identity the envelope carried.
    pub row_id: String,
    /// Rows affected by the statement.
    pub rows_affected: u64,
}

/// Handler for mutation requests.
///
/// Each request flows validate -> route -> bind -> execute; validation and
/// routing failures short-circuit before any store interaction, so a
/// rejected envelope has no side effects.
pub struct MutationHandler {
    context: Arc<HandlerContext>,
}

impl MutationHandler {
    /// Creates a new mutation handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles a create-or-update envelope.
    pub async fn handle_upsert(&self, envelope: &ChangeEnvelope) -> DispatchResult<Applied> {
        self.apply(MutationKind::Upsert, envelope).await
    }

    /// Handles a partial-update envelope.
    pub async fn handle_partial_update(
        &self,
        envelope: &ChangeEnvelope,
    ) -> DispatchResult<Applied> {
        self.apply(MutationKind::PartialUpdate, envelope).await
    }

    /// Handles a delete envelope.
    ///
    /// The table name is validated against the known set like every other
    /// verb; nothing client-controlled reaches the statement text.
    pub async fn handle_delete(&self, envelope: &ChangeEnvelope) -> DispatchResult<Applied> {
        self.apply(MutationKind::Delete, envelope).await
    }

    /// Applies one envelope as one statement.
    pub async fn apply(
        &self,
        kind: MutationKind,
        envelope: &ChangeEnvelope,
    ) -> DispatchResult<Applied> {
        let table = envelope.table()?;
        let row_id = envelope
            .row_id()
            .ok_or(driftsync_protocol::EnvelopeError::MissingId)?
            .to_string();

        let bound = self
            .context
            .catalog
            .route(table, kind, envelope)?
            .ok_or(DispatchError::NoMapping {
                table: table.as_str(),
                kind,
            })?;

        if self.context.config.log_rows {
            debug!(%table, %kind, row_id = %row_id, data = %envelope.data, "applying mutation");
        } else {
            debug!(%table, %kind, row_id = %row_id, "applying mutation");
        }

        let rows_affected = self.context.executor.execute(&bound).await?;

        Ok(Applied {
            table,
            kind,
            row_id,
            rows_affected,
        })
    }
}
