//! # DriftSync Postgres
//!
//! PostgreSQL adapter for the DriftSync dispatcher.
//!
//! This crate provides:
//! - `PgConfig` for environment-driven pool configuration
//! - `PgStorePool`, the production implementation of the dispatcher's
//!   `StorePool` seam over `deadpool-postgres`
//!
//! Pool construction and lifecycle stay here; the dispatcher only ever sees
//! the trait surface.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pool;

pub use config::PgConfig;
pub use pool::{PgStoreConnection, PgStorePool};
