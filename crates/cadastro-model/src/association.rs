use crate::{AssociationId, ProductId, SupplierId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Join record: "this supplier can provide this product". At most one per
/// (supplier, product) pair; removed automatically when either side is
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Association {
    pub id: AssociationId,
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAssociation {
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
}
