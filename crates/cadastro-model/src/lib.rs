#![forbid(unsafe_code)]
//! Cadastro model SSOT.
//!
//! Every field that crosses the API or storage boundary is parsed into a
//! validated type here; the store and server crates never re-validate.

mod association;
mod ids;
mod product;
mod supplier;

use std::fmt::{Display, Formatter};

pub use association::{Association, NewAssociation};
pub use ids::{AssociationId, ProductId, SupplierId};
pub use product::{
    Barcode, Category, NewProduct, Product, ProductUpdate, BARCODE_MAX_LEN, CATEGORY_MAX_LEN,
    KNOWN_CATEGORIES, NAME_MAX_LEN,
};
pub use supplier::{Cnpj, NewSupplier, Supplier, SupplierUpdate};

pub const CRATE_NAME: &str = "cadastro-model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn require_non_empty(field: &str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
