// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidPayload,
    InvalidIdentifier,
    DuplicateIdentifier,
    DuplicateAssociation,
    NotFound,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayload => "invalid_payload",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::DuplicateIdentifier => "duplicate_identifier",
            Self::DuplicateAssociation => "duplicate_association",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
        }
    }

    /// HTTP status for this kind. Kept as a bare `u16` so this crate stays
    /// framework-free.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidPayload | Self::InvalidIdentifier => 400,
            Self::NotFound => 404,
            Self::Timeout => 408,
            Self::DuplicateIdentifier | Self::DuplicateAssociation => 409,
            Self::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_payload(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::InvalidPayload,
            "validation failed",
            json!({"field_errors": field_errors}),
        )
    }

    #[must_use]
    pub fn invalid_identifier(field: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidIdentifier,
            format!("invalid {field}"),
            json!({"field": field, "value": value}),
        )
    }

    #[must_use]
    pub fn duplicate_identifier(field: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::DuplicateIdentifier,
            format!("{field} already registered"),
            json!({"field": field, "value": value}),
        )
    }

    #[must_use]
    pub fn duplicate_association(supplier_id: i64, product_id: i64) -> Self {
        Self::new(
            ApiErrorCode::DuplicateAssociation,
            "association already exists",
            json!({"supplier_id": supplier_id, "product_id": product_id}),
        )
    }

    #[must_use]
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{entity} not found"),
            json!({"entity": entity, "id": id}),
        )
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::new(ApiErrorCode::Internal, "internal error", json!({"message": message}))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_contract() {
        assert_eq!(ApiErrorCode::InvalidPayload.http_status(), 400);
        assert_eq!(ApiErrorCode::InvalidIdentifier.http_status(), 400);
        assert_eq!(ApiErrorCode::NotFound.http_status(), 404);
        assert_eq!(ApiErrorCode::Timeout.http_status(), 408);
        assert_eq!(ApiErrorCode::DuplicateIdentifier.http_status(), 409);
        assert_eq!(ApiErrorCode::DuplicateAssociation.http_status(), 409);
        assert_eq!(ApiErrorCode::Internal.http_status(), 500);
    }

    #[test]
    fn error_serializes_with_stable_shape() {
        let err = ApiError::duplicate_identifier("cnpj", "11.444.777/0001-61");
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["code"], "DuplicateIdentifier");
        assert_eq!(value["details"]["field"], "cnpj");
    }
}
