// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS suppliers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    cnpj          TEXT NOT NULL UNIQUE,
    address       TEXT NOT NULL,
    phone         TEXT NOT NULL,
    email         TEXT NOT NULL,
    contact_name  TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    barcode       TEXT UNIQUE,
    description   TEXT NOT NULL,
    quantity      INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    category      TEXT NOT NULL,
    expires_on    TEXT,
    image_ref     TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS supplier_products (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    supplier_id   INTEGER NOT NULL REFERENCES suppliers(id) ON DELETE CASCADE,
    product_id    INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL,
    UNIQUE (supplier_id, product_id)
);

CREATE INDEX IF NOT EXISTS idx_supplier_products_supplier
    ON supplier_products(supplier_id);
CREATE INDEX IF NOT EXISTS idx_supplier_products_product
    ON supplier_products(product_id);
";

pub(crate) fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    // foreign_keys is per-connection and off by default in SQLite; the
    // cascade rules depend on it.
    conn.execute_batch(
        "PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;",
    )
    .map_err(StoreError::from_sqlite)
}

pub(crate) fn apply_schema(conn: &Connection) -> Result<(), StoreError> {
    let on_disk: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(StoreError::from_sqlite)?;
    if on_disk > SCHEMA_VERSION {
        return Err(StoreError::Internal(format!(
            "database schema version {on_disk} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    conn.execute_batch(SCHEMA).map_err(StoreError::from_sqlite)?;
    if on_disk < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(StoreError::from_sqlite)?;
    }
    Ok(())
}
