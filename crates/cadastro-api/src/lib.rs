#![forbid(unsafe_code)]
//! Wire contract for the cadastro REST API: request payloads, the error
//! taxonomy, and HTTP status mapping. Framework-free on purpose; the server
//! crate owns the axum plumbing.

mod dto;
mod errors;

pub use dto::{
    AssociationPayload, ProductPatch, ProductPayload, SupplierPatch, SupplierPayload,
};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "cadastro-api";
pub const API_VERSION: &str = "v1";
