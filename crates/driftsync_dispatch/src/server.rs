//! The mutation server facade.

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::executor::StorePool;
use crate::handler::{HandlerContext, MutationHandler};
use driftsync_protocol::{ChangeEnvelope, MutationKind, MutationResponse};
use std::sync::Arc;
use tracing::warn;

/// The mutation server.
///
/// This is the embedding surface for the write path: an HTTP layer maps its
/// verbs onto [`MutationServer::handle_put`], [`handle_patch`] and
/// [`handle_delete`] (or the `*_json` variants when it holds raw bodies)
/// and forwards the returned status and message verbatim.
///
/// Error-to-status mapping happens exactly once, here: client errors become
/// 400 responses with the original wire messages, store failures become 500
/// responses carrying the underlying error text.
///
/// [`handle_patch`]: MutationServer::handle_patch
/// [`handle_delete`]: MutationServer::handle_delete
///
/// # Example
///
/// ```
/// use driftsync_dispatch::{DispatcherConfig, MockPool, MutationServer};
/// use std::sync::Arc;
///
/// let server = MutationServer::new(DispatcherConfig::default(), Arc::new(MockPool::new()));
///
/// // In a real application, an HTTP router would call
/// // server.handle_put_json(), handle_patch_json(), handle_delete_json()
/// ```
pub struct MutationServer {
    handler: MutationHandler,
    context: Arc<HandlerContext>,
}

impl MutationServer {
    /// Creates a new mutation server over the given pool.
    pub fn new(config: DispatcherConfig, pool: Arc<dyn StorePool>) -> Self {
        let context = Arc::new(HandlerContext::new(config, pool));
        let handler = MutationHandler::new(Arc::clone(&context));

        Self { handler, context }
    }

    /// Handles a create-or-update request.
    pub async fn handle_put(&self, envelope: &ChangeEnvelope) -> MutationResponse {
        self.apply(MutationKind::Upsert, envelope).await
    }

    /// Handles a partial-update request.
    pub async fn handle_patch(&self, envelope: &ChangeEnvelope) -> MutationResponse {
        self.apply(MutationKind::PartialUpdate, envelope).await
    }

    /// Handles a delete request.
    pub async fn handle_delete(&self, envelope: &ChangeEnvelope) -> MutationResponse {
        self.apply(MutationKind::Delete, envelope).await
    }

    /// Handles a create-or-update request from a raw JSON body.
    pub async fn handle_put_json(&self, body: &[u8]) -> MutationResponse {
        self.apply_json(MutationKind::Upsert, body).await
    }

    /// Handles a partial-update request from a raw JSON body.
    pub async fn handle_patch_json(&self, body: &[u8]) -> MutationResponse {
        self.apply_json(MutationKind::PartialUpdate, body).await
    }

    /// Handles a delete request from a raw JSON body.
    pub async fn handle_delete_json(&self, body: &[u8]) -> MutationResponse {
        self.apply_json(MutationKind::Delete, body).await
    }

    /// Applies an envelope under the given mutation kind.
    pub async fn apply(
        &self,
        kind: MutationKind,
        envelope: &ChangeEnvelope,
    ) -> MutationResponse {
        match self.handler.apply(kind, envelope).await {
            Ok(applied) => MutationResponse::completed(
                applied.kind,
                applied.table,
                &applied.row_id,
                applied.rows_affected,
            ),
            Err(err) => self.error_response(kind, err),
        }
    }

    /// Decodes a raw body and applies it.
    ///
    /// A missing, oversized, or unparseable body is rejected before any
    /// routing happens.
    pub async fn apply_json(&self, kind: MutationKind, body: &[u8]) -> MutationResponse {
        if body.len() > self.context.config.max_envelope_bytes {
            return MutationResponse::invalid("Invalid body provided");
        }
        match ChangeEnvelope::from_json(body) {
            Ok(envelope) => self.apply(kind, &envelope).await,
            Err(_) => MutationResponse::invalid("Invalid body provided"),
        }
    }

    fn error_response(&self, kind: MutationKind, err: DispatchError) -> MutationResponse {
        match err {
            // Unknown tables and unmapped operations answer with the wire
            // message sync clients already expect.
            DispatchError::NoMapping { table, kind } => {
                warn!(%table, %kind, "no statement mapping for request");
                MutationResponse::invalid("Invalid body provided, expected table and data")
            }
            DispatchError::UnknownTable(ref table) => {
                warn!(%table, %kind, "envelope named an unknown table");
                MutationResponse::invalid("Invalid body provided, expected table and data")
            }
            err if err.is_client_error() => {
                warn!(%kind, error = %err, "rejected envelope");
                MutationResponse::invalid(err.to_string())
            }
            err => {
                warn!(%kind, error = %err, "store failure");
                MutationResponse::store_failure(err.to_string())
            }
        }
    }
}
