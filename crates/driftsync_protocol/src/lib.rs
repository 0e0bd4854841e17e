//! # DriftSync Protocol
//!
//! Protocol types for the DriftSync mutation endpoint.
//!
//! This crate provides:
//! - `ChangeEnvelope` for the `{table, data}` unit of work sent by clients
//! - `Table` and `MutationKind` identifier sets
//! - Typed row payloads (`ListRow`, `TodoRow`, `TodoCompletion`, `DeleteKey`)
//! - `MutationResponse` for the caller-facing result shape
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod operation;
mod response;
mod row;
mod table;

pub use envelope::{ChangeEnvelope, EnvelopeError};
pub use operation::MutationKind;
pub use response::MutationResponse;
pub use row::{DeleteKey, ListRow, TodoCompletion, TodoRow};
pub use table::Table;
