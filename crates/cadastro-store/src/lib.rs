#![forbid(unsafe_code)]
//! SQLite persistence for cadastro.
//!
//! The schema's UNIQUE constraints and `ON DELETE CASCADE` foreign keys are
//! the authoritative integrity guarantee. The lookup pre-checks in
//! [`RegistryStore`] exist only to classify rejections with a friendly
//! reason; a constraint violation that races past them is mapped to the same
//! error kind, never surfaced as an internal failure.

mod error;
mod registry;
mod schema;

pub use error::StoreError;
pub use registry::RegistryStore;
pub use schema::SCHEMA_VERSION;

pub const CRATE_NAME: &str = "cadastro-store";
