use crate::{require_non_empty, ProductId, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const NAME_MAX_LEN: usize = 120;
pub const BARCODE_MAX_LEN: usize = 48;
pub const CATEGORY_MAX_LEN: usize = 64;

/// Closed label set served to clients; a presentation concern, not a model
/// invariant. `Category::parse` only enforces non-empty bounded text.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Alimentos",
    "Bebidas",
    "Higiene",
    "Limpeza",
    "Papelaria",
    "Outros",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = require_non_empty("barcode", input)?;
        if s.len() > BARCODE_MAX_LEN {
            return Err(ValidationError(format!(
                "barcode exceeds max length {BARCODE_MAX_LEN}"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError(
                "barcode must match [A-Za-z0-9-]+".to_string(),
            ));
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Barcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = require_non_empty("category", input)?;
        if s.len() > CATEGORY_MAX_LEN {
            return Err(ValidationError(format!(
                "category exceeds max length {CATEGORY_MAX_LEN}"
            )));
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub barcode: Option<Barcode>,
    pub description: String,
    pub quantity: u32,
    pub category: Category,
    pub expires_on: Option<NaiveDate>,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<Barcode>,
    pub description: String,
    pub quantity: u32,
    pub category: Category,
    pub expires_on: Option<NaiveDate>,
    pub image_ref: Option<String>,
}

impl NewProduct {
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        name: &str,
        barcode: Option<&str>,
        description: &str,
        quantity: u32,
        category: &str,
        expires_on: Option<NaiveDate>,
        image_ref: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = require_non_empty("name", name)?;
        if name.len() > NAME_MAX_LEN {
            return Err(ValidationError(format!(
                "name exceeds max length {NAME_MAX_LEN}"
            )));
        }
        Ok(Self {
            name,
            barcode: barcode.map(Barcode::parse).transpose()?,
            description: require_non_empty("description", description)?,
            quantity,
            category: Category::parse(category)?,
            expires_on,
            image_ref: image_ref
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Partial update: `None` leaves the stored field untouched. Barcode and the
/// other optional fields use a double `Option` so "set to null" and "leave
/// alone" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub barcode: Option<Option<Barcode>>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub category: Option<Category>,
    pub expires_on: Option<Option<NaiveDate>>,
    pub image_ref: Option<Option<String>>,
}

impl ProductUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.barcode.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.expires_on.is_none()
            && self.image_ref.is_none()
    }

    #[must_use]
    pub fn apply(&self, current: &Product) -> Product {
        Product {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            barcode: self
                .barcode
                .clone()
                .unwrap_or_else(|| current.barcode.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            quantity: self.quantity.unwrap_or(current.quantity),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| current.category.clone()),
            expires_on: self.expires_on.unwrap_or(current.expires_on),
            image_ref: self
                .image_ref
                .clone()
                .unwrap_or_else(|| current.image_ref.clone()),
            created_at: current.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_rejects_empty_and_overlong() {
        assert!(Barcode::parse("").is_err());
        assert!(Barcode::parse(&"9".repeat(BARCODE_MAX_LEN + 1)).is_err());
        assert!(Barcode::parse("7891000100103").is_ok());
    }

    #[test]
    fn barcode_rejects_non_alphanumeric() {
        assert!(Barcode::parse("789 100").is_err());
        assert!(Barcode::parse("ABC-123").is_ok());
    }

    #[test]
    fn category_only_requires_non_empty_bounded_text() {
        assert!(Category::parse("  ").is_err());
        assert_eq!(Category::parse(" Bebidas ").expect("ok").as_str(), "Bebidas");
    }

    #[test]
    fn new_product_accepts_absent_barcode() {
        let p = NewProduct::parse("Arroz", None, "5kg", 10, "Alimentos", None, None)
            .expect("valid product");
        assert!(p.barcode.is_none());
        assert_eq!(p.quantity, 10);
    }

    #[test]
    fn update_can_clear_barcode_without_touching_quantity() {
        let base = Product {
            id: ProductId(7),
            name: "Arroz".to_string(),
            barcode: Some(Barcode::parse("7891000100103").expect("barcode")),
            description: "5kg".to_string(),
            quantity: 4,
            category: Category::parse("Alimentos").expect("category"),
            expires_on: None,
            image_ref: None,
            created_at: Utc::now(),
        };
        let update = ProductUpdate {
            barcode: Some(None),
            ..Default::default()
        };
        let next = update.apply(&base);
        assert!(next.barcode.is_none());
        assert_eq!(next.quantity, 4);
    }
}
