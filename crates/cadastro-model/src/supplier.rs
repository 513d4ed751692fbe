use crate::{require_non_empty, SupplierId, ValidationError};
use cadastro_core::{format_cnpj, format_phone, validate_cnpj, CNPJ_DISPLAY_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Canonical CNPJ: always the 18-character punctuated display form, and
/// always check-digit valid. Uniqueness comparisons operate on this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Cnpj(String);

impl Cnpj {
    /// Accepts bare or punctuated input; canonicalizes before validating.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if !validate_cnpj(input) {
            return Err(ValidationError(format!("invalid CNPJ: {input}")));
        }
        let canonical = format_cnpj(input);
        debug_assert_eq!(canonical.len(), CNPJ_DISPLAY_LEN);
        Ok(Self(canonical))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cnpj {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub cnpj: Cnpj,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub contact_name: String,
    pub created_at: DateTime<Utc>,
}

/// A supplier record as submitted, after field validation but before it has
/// an identity. Phone is stored pre-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub cnpj: Cnpj,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub contact_name: String,
}

impl NewSupplier {
    pub fn parse(
        name: &str,
        cnpj: &str,
        address: &str,
        phone: &str,
        email: &str,
        contact_name: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_non_empty("name", name)?,
            cnpj: Cnpj::parse(cnpj)?,
            address: require_non_empty("address", address)?,
            phone: format_phone(phone),
            email: email.trim().to_string(),
            contact_name: require_non_empty("contact_name", contact_name)?,
        })
    }
}

/// Partial update: `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub cnpj: Option<Cnpj>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_name: Option<String>,
}

impl SupplierUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cnpj.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.contact_name.is_none()
    }

    #[must_use]
    pub fn apply(&self, current: &Supplier) -> Supplier {
        Supplier {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            cnpj: self.cnpj.clone().unwrap_or_else(|| current.cnpj.clone()),
            address: self
                .address
                .clone()
                .unwrap_or_else(|| current.address.clone()),
            phone: self.phone.clone().unwrap_or_else(|| current.phone.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            contact_name: self
                .contact_name
                .clone()
                .unwrap_or_else(|| current.contact_name.clone()),
            created_at: current.created_at,
        }
    }
}
