// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use cadastro_model::{
    Barcode, Category, Cnpj, NewAssociation, NewProduct, NewSupplier, ProductId, ProductUpdate,
    SupplierId, SupplierUpdate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn field_error(field: &str, reason: &str) -> Value {
    json!({"field": field, "reason": reason})
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierPayload {
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub contact_name: String,
}

impl SupplierPayload {
    pub fn into_record(self) -> Result<NewSupplier, ApiError> {
        NewSupplier::parse(
            &self.name,
            &self.cnpj,
            &self.address,
            &self.phone,
            &self.email,
            &self.contact_name,
        )
        .map_err(|e| {
            if e.0.contains("CNPJ") {
                ApiError::invalid_identifier("cnpj", &self.cnpj)
            } else {
                ApiError::invalid_payload(json!([field_error("supplier", &e.0)]))
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_name: Option<String>,
}

impl SupplierPatch {
    pub fn into_update(self) -> Result<SupplierUpdate, ApiError> {
        let cnpj = match &self.cnpj {
            Some(raw) => Some(
                Cnpj::parse(raw).map_err(|_| ApiError::invalid_identifier("cnpj", raw))?,
            ),
            None => None,
        };
        let mut field_errors = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("address", &self.address),
            ("contact_name", &self.contact_name),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                field_errors.push(field_error(field, "must not be empty"));
            }
        }
        if !field_errors.is_empty() {
            return Err(ApiError::invalid_payload(Value::Array(field_errors)));
        }
        Ok(SupplierUpdate {
            name: self.name.map(|v| v.trim().to_string()),
            cnpj,
            address: self.address.map(|v| v.trim().to_string()),
            phone: self.phone.as_deref().map(cadastro_core::format_phone),
            email: self.email.map(|v| v.trim().to_string()),
            contact_name: self.contact_name.map(|v| v.trim().to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPayload {
    pub name: String,
    pub barcode: Option<String>,
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    pub category: String,
    pub expires_on: Option<NaiveDate>,
    pub image_ref: Option<String>,
}

impl ProductPayload {
    pub fn into_record(self) -> Result<NewProduct, ApiError> {
        if self.quantity < 0 {
            return Err(ApiError::invalid_payload(json!([field_error(
                "quantity",
                "must be non-negative"
            )])));
        }
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            ApiError::invalid_payload(json!([field_error("quantity", "out of range")]))
        })?;
        NewProduct::parse(
            &self.name,
            self.barcode.as_deref(),
            &self.description,
            quantity,
            &self.category,
            self.expires_on,
            self.image_ref.as_deref(),
        )
        .map_err(|e| ApiError::invalid_payload(json!([field_error("product", &e.0)])))
    }
}

/// Patch for a product. Optional columns distinguish "absent" (leave alone)
/// from explicit `null` (clear) via the double `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    pub barcode: Option<Option<String>>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
    #[serde(default, with = "double_option")]
    pub expires_on: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option")]
    pub image_ref: Option<Option<String>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

impl ProductPatch {
    pub fn into_update(self) -> Result<ProductUpdate, ApiError> {
        let mut field_errors = Vec::new();
        if self.name.as_deref().is_some_and(|v| v.trim().is_empty()) {
            field_errors.push(field_error("name", "must not be empty"));
        }
        if self
            .description
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            field_errors.push(field_error("description", "must not be empty"));
        }
        if self
            .quantity
            .is_some_and(|q| q < 0 || q > i64::from(u32::MAX))
        {
            field_errors.push(field_error("quantity", "out of range"));
        }
        if !field_errors.is_empty() {
            return Err(ApiError::invalid_payload(Value::Array(field_errors)));
        }
        let barcode = match self.barcode {
            Some(Some(raw)) => Some(Some(Barcode::parse(&raw).map_err(|_| {
                ApiError::invalid_identifier("barcode", &raw)
            })?)),
            Some(None) => Some(None),
            None => None,
        };
        let category = match &self.category {
            Some(raw) => Some(Category::parse(raw).map_err(|e| {
                ApiError::invalid_payload(json!([field_error("category", &e.0)]))
            })?),
            None => None,
        };
        Ok(ProductUpdate {
            name: self.name.map(|v| v.trim().to_string()),
            barcode,
            description: self.description.map(|v| v.trim().to_string()),
            quantity: self.quantity.and_then(|q| u32::try_from(q).ok()),
            category,
            expires_on: self.expires_on,
            image_ref: self.image_ref,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationPayload {
    pub supplier_id: i64,
    pub product_id: i64,
}

impl AssociationPayload {
    #[must_use]
    pub fn into_record(self) -> NewAssociation {
        NewAssociation {
            supplier_id: SupplierId(self.supplier_id),
            product_id: ProductId(self.product_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_payload_maps_bad_cnpj_to_invalid_identifier() {
        let payload = SupplierPayload {
            name: "Acme".to_string(),
            cnpj: "11.444.777/0001-62".to_string(),
            address: "Rua A".to_string(),
            phone: "1199998888".to_string(),
            email: String::new(),
            contact_name: "Maria".to_string(),
        };
        let err = payload.into_record().expect_err("bad check digit");
        assert_eq!(err.code, crate::ApiErrorCode::InvalidIdentifier);
    }

    #[test]
    fn product_payload_rejects_negative_quantity() {
        let payload = ProductPayload {
            name: "Arroz".to_string(),
            barcode: None,
            description: "5kg".to_string(),
            quantity: -1,
            category: "Alimentos".to_string(),
            expires_on: None,
            image_ref: None,
        };
        let err = payload.into_record().expect_err("negative quantity");
        assert_eq!(err.code, crate::ApiErrorCode::InvalidPayload);
    }

    #[test]
    fn product_patch_distinguishes_absent_from_null_barcode() {
        let absent: ProductPatch = serde_json::from_str(r#"{"quantity": 3}"#).expect("json");
        assert!(absent.barcode.is_none());

        let cleared: ProductPatch = serde_json::from_str(r#"{"barcode": null}"#).expect("json");
        assert_eq!(cleared.barcode, Some(None));

        let update = cleared.into_update().expect("update");
        assert_eq!(update.barcode, Some(None));
    }

    #[test]
    fn supplier_patch_formats_phone() {
        let patch = SupplierPatch {
            phone: Some("11999998888".to_string()),
            ..Default::default()
        };
        let update = patch.into_update().expect("update");
        assert_eq!(update.phone.as_deref(), Some("(11) 99999-8888"));
    }
}
