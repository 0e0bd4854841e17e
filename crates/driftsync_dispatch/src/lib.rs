//! # DriftSync Dispatch
//!
//! The mutation dispatcher: the server-side write path for a local-first
//! sync client.
//!
//! This crate provides:
//! - A statement catalog mapping `(Table, MutationKind)` to parameterized
//!   SQL with last-writer-wins upsert semantics
//! - A transactional executor over an injected connection-pool trait
//! - Request handlers that validate, route, bind, and execute one statement
//!   per envelope
//! - A server facade mapping outcomes to caller-facing responses
//!
//! The HTTP layer and the relational store are external collaborators; see
//! [`StorePool`] for the seam a production adapter implements.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod error;
mod executor;
mod handler;
mod server;
mod statement;

pub use catalog::{
    StatementCatalog, LISTS_DELETE_SQL, LISTS_UPSERT_SQL, TODOS_DELETE_SQL, TODOS_PARTIAL_SQL,
    TODOS_UPSERT_SQL,
};
pub use config::DispatcherConfig;
pub use error::{DispatchError, DispatchResult, StoreError};
pub use executor::{Executor, MockConnection, MockPool, StoreConnection, StorePool};
pub use handler::{Applied, HandlerContext, MutationHandler};
pub use server::MutationServer;
pub use statement::{BoundStatement, SqlValue};
