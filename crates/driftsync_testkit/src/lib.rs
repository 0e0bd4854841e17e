//! # DriftSync Testkit
//!
//! Test utilities for DriftSync.
//!
//! This crate provides:
//! - Envelope builders with generated row identities
//! - An in-memory store applying the statement catalog semantically
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use driftsync_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn test_with_memory_store() {
//!     let (server, store) = memory_server();
//!     let response = server.handle_put(&list_envelope("L1")).await;
//!     assert!(response.is_success());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod memory;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::memory::*;
}

pub use fixtures::*;
pub use generators::*;
pub use memory::*;
