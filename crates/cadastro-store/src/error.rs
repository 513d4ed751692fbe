// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// CNPJ or barcode collides with a different record.
    DuplicateIdentifier { field: &'static str, value: String },
    /// An association for this (supplier, product) pair already exists.
    DuplicateAssociation { supplier_id: i64, product_id: i64 },
    /// Referenced row does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// SQLite fault outside the classified taxonomy.
    Internal(String),
}

impl StoreError {
    #[must_use]
    pub fn duplicate(field: &'static str, value: &str) -> Self {
        Self::DuplicateIdentifier {
            field,
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateIdentifier { field, value } => {
                write!(f, "duplicate {field}: {value}")
            }
            Self::DuplicateAssociation {
                supplier_id,
                product_id,
            } => write!(
                f,
                "association already exists for supplier {supplier_id} and product {product_id}"
            ),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Internal(msg) => write!(f, "store failure: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The `suppliers.cnpj`-style target of a UNIQUE violation, when `err` is
/// one. Used by write paths to classify races the pre-checks did not see.
pub(crate) fn unique_violation_target(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(msg))
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            msg.strip_prefix("UNIQUE constraint failed: ")
        }
        _ => None,
    }
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
