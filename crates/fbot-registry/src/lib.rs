//! Persisted user registry.
//!
//! This crate provides:
//! - Upsert-only storage of users seen by the bot
//! - Registry listing for stats and broadcast targeting
//!
//! Backed by a single SQLite table. There is no delete operation.

pub mod error;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use store::UserRegistry;
