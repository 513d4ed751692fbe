// SPDX-License-Identifier: Apache-2.0

use crate::error::{is_foreign_key_violation, unique_violation_target};
use crate::schema::{apply_pragmas, apply_schema};
use crate::StoreError;
use cadastro_model::{
    Association, AssociationId, Barcode, Category, Cnpj, NewAssociation, NewProduct, NewSupplier,
    Product, ProductId, ProductUpdate, Supplier, SupplierId, SupplierUpdate,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SUPPLIER_COLUMNS: &str =
    "id, name, cnpj, address, phone, email, contact_name, created_at";
const PRODUCT_COLUMNS: &str =
    "id, name, barcode, description, quantity, category, expires_on, image_ref, created_at";

#[derive(Debug)]
pub struct RegistryStore {
    conn: Connection,
}

impl RegistryStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::from_sqlite)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from_sqlite)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        apply_pragmas(&conn)?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    // ----- suppliers -----

    pub fn create_supplier(&self, record: &NewSupplier) -> Result<Supplier, StoreError> {
        if self.supplier_id_by_cnpj(&record.cnpj)?.is_some() {
            return Err(StoreError::duplicate("cnpj", record.cnpj.as_str()));
        }
        let created_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO suppliers (name, cnpj, address, phone, email, contact_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.name,
                    record.cnpj.as_str(),
                    record.address,
                    record.phone,
                    record.email,
                    record.contact_name,
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| classify_unique(e, "cnpj", record.cnpj.as_str()))?;
        self.supplier(SupplierId(self.conn.last_insert_rowid()))
    }

    pub fn supplier(&self, id: SupplierId) -> Result<Supplier, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"),
                params![id.as_i64()],
                supplier_from_row,
            )
            .optional()
            .map_err(StoreError::from_sqlite)?
            .transpose()?
            .ok_or_else(|| StoreError::not_found("supplier", id.as_i64()))
    }

    pub fn list_suppliers(&self, limit: usize, offset: usize) -> Result<Vec<Supplier>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY id LIMIT ?1 OFFSET ?2"
            ))
            .map_err(StoreError::from_sqlite)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], supplier_from_row)
            .map_err(StoreError::from_sqlite)?;
        collect_rows(rows)
    }

    pub fn update_supplier(
        &self,
        id: SupplierId,
        update: &SupplierUpdate,
    ) -> Result<Supplier, StoreError> {
        let current = self.supplier(id)?;
        if let Some(cnpj) = &update.cnpj {
            if cnpj != &current.cnpj {
                if let Some(holder) = self.supplier_id_by_cnpj(cnpj)? {
                    if holder != id {
                        return Err(StoreError::duplicate("cnpj", cnpj.as_str()));
                    }
                }
            }
        }
        let next = update.apply(&current);
        self.conn
            .execute(
                "UPDATE suppliers
                 SET name = ?1, cnpj = ?2, address = ?3, phone = ?4, email = ?5, contact_name = ?6
                 WHERE id = ?7",
                params![
                    next.name,
                    next.cnpj.as_str(),
                    next.address,
                    next.phone,
                    next.email,
                    next.contact_name,
                    id.as_i64(),
                ],
            )
            .map_err(|e| classify_unique(e, "cnpj", next.cnpj.as_str()))?;
        Ok(next)
    }

    pub fn delete_supplier(&self, id: SupplierId) -> Result<(), StoreError> {
        // ON DELETE CASCADE removes the supplier's associations inside the
        // same statement.
        let changed = self
            .conn
            .execute("DELETE FROM suppliers WHERE id = ?1", params![id.as_i64()])
            .map_err(StoreError::from_sqlite)?;
        if changed == 0 {
            return Err(StoreError::not_found("supplier", id.as_i64()));
        }
        Ok(())
    }

    fn supplier_id_by_cnpj(&self, cnpj: &Cnpj) -> Result<Option<SupplierId>, StoreError> {
        self.conn
            .query_row(
                "SELECT id FROM suppliers WHERE cnpj = ?1",
                params![cnpj.as_str()],
                |row| row.get::<_, i64>(0).map(SupplierId),
            )
            .optional()
            .map_err(StoreError::from_sqlite)
    }

    // ----- products -----

    pub fn create_product(&self, record: &NewProduct) -> Result<Product, StoreError> {
        if let Some(barcode) = &record.barcode {
            if self.product_id_by_barcode(barcode)?.is_some() {
                return Err(StoreError::duplicate("barcode", barcode.as_str()));
            }
        }
        let created_at = Utc::now();
        let barcode = record.barcode.as_ref().map(Barcode::as_str);
        self.conn
            .execute(
                "INSERT INTO products (name, barcode, description, quantity, category, expires_on, image_ref, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.name,
                    barcode,
                    record.description,
                    i64::from(record.quantity),
                    record.category.as_str(),
                    record.expires_on.map(|d| d.to_string()),
                    record.image_ref,
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| classify_unique(e, "barcode", barcode.unwrap_or_default()))?;
        self.product(ProductId(self.conn.last_insert_rowid()))
    }

    pub fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id.as_i64()],
                product_from_row,
            )
            .optional()
            .map_err(StoreError::from_sqlite)?
            .transpose()?
            .ok_or_else(|| StoreError::not_found("product", id.as_i64()))
    }

    pub fn list_products(&self, limit: usize, offset: usize) -> Result<Vec<Product>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ?1 OFFSET ?2"
            ))
            .map_err(StoreError::from_sqlite)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], product_from_row)
            .map_err(StoreError::from_sqlite)?;
        collect_rows(rows)
    }

    pub fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, StoreError> {
        let current = self.product(id)?;
        if let Some(Some(barcode)) = &update.barcode {
            if current.barcode.as_ref() != Some(barcode) {
                if let Some(holder) = self.product_id_by_barcode(barcode)? {
                    if holder != id {
                        return Err(StoreError::duplicate("barcode", barcode.as_str()));
                    }
                }
            }
        }
        let next = update.apply(&current);
        let barcode = next.barcode.as_ref().map(Barcode::as_str);
        self.conn
            .execute(
                "UPDATE products
                 SET name = ?1, barcode = ?2, description = ?3, quantity = ?4, category = ?5,
                     expires_on = ?6, image_ref = ?7
                 WHERE id = ?8",
                params![
                    next.name,
                    barcode,
                    next.description,
                    i64::from(next.quantity),
                    next.category.as_str(),
                    next.expires_on.map(|d| d.to_string()),
                    next.image_ref,
                    id.as_i64(),
                ],
            )
            .map_err(|e| classify_unique(e, "barcode", barcode.unwrap_or_default()))?;
        Ok(next)
    }

    pub fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", params![id.as_i64()])
            .map_err(StoreError::from_sqlite)?;
        if changed == 0 {
            return Err(StoreError::not_found("product", id.as_i64()));
        }
        Ok(())
    }

    fn product_id_by_barcode(&self, barcode: &Barcode) -> Result<Option<ProductId>, StoreError> {
        self.conn
            .query_row(
                "SELECT id FROM products WHERE barcode = ?1",
                params![barcode.as_str()],
                |row| row.get::<_, i64>(0).map(ProductId),
            )
            .optional()
            .map_err(StoreError::from_sqlite)
    }

    // ----- associations -----

    pub fn create_association(
        &self,
        record: &NewAssociation,
    ) -> Result<Association, StoreError> {
        // Both referents must exist before the pair check so a missing
        // supplier reports NotFound rather than riding the FK violation.
        self.supplier(record.supplier_id)?;
        self.product(record.product_id)?;
        if self
            .association_id_for_pair(record.supplier_id, record.product_id)?
            .is_some()
        {
            return Err(StoreError::DuplicateAssociation {
                supplier_id: record.supplier_id.as_i64(),
                product_id: record.product_id.as_i64(),
            });
        }
        let created_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO supplier_products (supplier_id, product_id, created_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    record.supplier_id.as_i64(),
                    record.product_id.as_i64(),
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if unique_violation_target(&e).is_some() {
                    StoreError::DuplicateAssociation {
                        supplier_id: record.supplier_id.as_i64(),
                        product_id: record.product_id.as_i64(),
                    }
                } else if is_foreign_key_violation(&e) {
                    StoreError::not_found("supplier or product", record.supplier_id.as_i64())
                } else {
                    StoreError::from_sqlite(e)
                }
            })?;
        Ok(Association {
            id: AssociationId(self.conn.last_insert_rowid()),
            supplier_id: record.supplier_id,
            product_id: record.product_id,
            created_at,
        })
    }

    pub fn list_associations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Association>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, supplier_id, product_id, created_at FROM supplier_products
                 ORDER BY id LIMIT ?1 OFFSET ?2",
            )
            .map_err(StoreError::from_sqlite)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], association_from_row)
            .map_err(StoreError::from_sqlite)?;
        collect_rows(rows)
    }

    pub fn delete_association(&self, id: AssociationId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM supplier_products WHERE id = ?1",
                params![id.as_i64()],
            )
            .map_err(StoreError::from_sqlite)?;
        if changed == 0 {
            return Err(StoreError::not_found("association", id.as_i64()));
        }
        Ok(())
    }

    pub fn products_for_supplier(&self, id: SupplierId) -> Result<Vec<Product>, StoreError> {
        self.supplier(id)?;
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM products p
                 JOIN supplier_products sp ON sp.product_id = p.id
                 WHERE sp.supplier_id = ?1
                 ORDER BY p.id",
                PRODUCT_COLUMNS
                    .split(", ")
                    .map(|c| format!("p.{c}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .map_err(StoreError::from_sqlite)?;
        let rows = stmt
            .query_map(params![id.as_i64()], product_from_row)
            .map_err(StoreError::from_sqlite)?;
        collect_rows(rows)
    }

    fn association_id_for_pair(
        &self,
        supplier_id: SupplierId,
        product_id: ProductId,
    ) -> Result<Option<AssociationId>, StoreError> {
        self.conn
            .query_row(
                "SELECT id FROM supplier_products WHERE supplier_id = ?1 AND product_id = ?2",
                params![supplier_id.as_i64(), product_id.as_i64()],
                |row| row.get::<_, i64>(0).map(AssociationId),
            )
            .optional()
            .map_err(StoreError::from_sqlite)
    }
}

fn classify_unique(err: rusqlite::Error, field: &'static str, value: &str) -> StoreError {
    if unique_violation_target(&err).is_some() {
        StoreError::duplicate(field, value)
    } else {
        StoreError::from_sqlite(err)
    }
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<Result<T, StoreError>>>,
) -> Result<Vec<T>, StoreError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(StoreError::from_sqlite)??);
    }
    Ok(out)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Internal(format!("bad created_at in store: {e}")))
}

fn supplier_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Supplier, StoreError>> {
    let cnpj_raw: String = row.get(2)?;
    let created_raw: String = row.get(7)?;
    Ok((|| {
        Ok(Supplier {
            id: SupplierId(row_i64(row, 0)?),
            name: row_string(row, 1)?,
            cnpj: Cnpj::parse(&cnpj_raw)
                .map_err(|e| StoreError::Internal(format!("bad cnpj in store: {e}")))?,
            address: row_string(row, 3)?,
            phone: row_string(row, 4)?,
            email: row_string(row, 5)?,
            contact_name: row_string(row, 6)?,
            created_at: parse_timestamp(&created_raw)?,
        })
    })())
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Product, StoreError>> {
    let barcode_raw: Option<String> = row.get(2)?;
    let expires_raw: Option<String> = row.get(6)?;
    let created_raw: String = row.get(8)?;
    let quantity: i64 = row.get(4)?;
    let category_raw: String = row.get(5)?;
    Ok((|| {
        Ok(Product {
            id: ProductId(row_i64(row, 0)?),
            name: row_string(row, 1)?,
            barcode: barcode_raw
                .as_deref()
                .map(Barcode::parse)
                .transpose()
                .map_err(|e| StoreError::Internal(format!("bad barcode in store: {e}")))?,
            description: row_string(row, 3)?,
            quantity: u32::try_from(quantity)
                .map_err(|_| StoreError::Internal("negative quantity in store".to_string()))?,
            category: Category::parse(&category_raw)
                .map_err(|e| StoreError::Internal(format!("bad category in store: {e}")))?,
            expires_on: expires_raw
                .as_deref()
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
                .transpose()
                .map_err(|e| StoreError::Internal(format!("bad expires_on in store: {e}")))?,
            image_ref: row_opt_string(row, 7)?,
            created_at: parse_timestamp(&created_raw)?,
        })
    })())
}

fn association_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Association, StoreError>> {
    let created_raw: String = row.get(3)?;
    Ok((|| {
        Ok(Association {
            id: AssociationId(row_i64(row, 0)?),
            supplier_id: SupplierId(row_i64(row, 1)?),
            product_id: ProductId(row_i64(row, 2)?),
            created_at: parse_timestamp(&created_raw)?,
        })
    })())
}

fn row_i64(row: &Row<'_>, idx: usize) -> Result<i64, StoreError> {
    row.get(idx)
        .map_err(|e| StoreError::Internal(e.to_string()))
}

fn row_string(row: &Row<'_>, idx: usize) -> Result<String, StoreError> {
    row.get(idx)
        .map_err(|e| StoreError::Internal(e.to_string()))
}

fn row_opt_string(row: &Row<'_>, idx: usize) -> Result<Option<String>, StoreError> {
    row.get(idx)
        .map_err(|e| StoreError::Internal(e.to_string()))
}
