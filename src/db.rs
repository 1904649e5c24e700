use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::model::{
    CustomerRaw, ErpCategoryRaw, ErpCustomerRaw, ErpLocationRaw, ProductRaw, SalesRaw,
};

/// Open (or create) the warehouse database.
pub fn open_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}

// ============================================================================
// BRONZE SCHEMA
// Provisioning of the raw layer belongs to the ingestion collaborator; this
// DDL stands in for it so the seed command and the tests have somewhere to
// put bronze rows. Nothing here is validated - bronze is raw by contract.
// ============================================================================

pub fn setup_bronze(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS bronze_crm_customers (
            customer_id INTEGER,
            customer_number TEXT,
            first_name TEXT,
            last_name TEXT,
            marital_status TEXT,
            gender TEXT,
            created TEXT
        );

        CREATE TABLE IF NOT EXISTS bronze_crm_products (
            product_id INTEGER,
            product_key TEXT,
            product_name TEXT,
            cost REAL,
            line TEXT,
            start_date TEXT,
            end_date TEXT
        );

        CREATE TABLE IF NOT EXISTS bronze_crm_sales (
            order_number TEXT,
            product_key TEXT,
            customer_id INTEGER,
            order_date INTEGER,
            ship_date INTEGER,
            due_date INTEGER,
            sales REAL,
            quantity INTEGER,
            price REAL
        );

        CREATE TABLE IF NOT EXISTS bronze_erp_customers (
            customer_id TEXT,
            birthdate TEXT,
            gender TEXT
        );

        CREATE TABLE IF NOT EXISTS bronze_erp_locations (
            customer_id TEXT,
            country TEXT
        );

        CREATE TABLE IF NOT EXISTS bronze_erp_categories (
            category_id TEXT,
            category TEXT,
            subcategory TEXT,
            maintenance TEXT
        );",
    )
}

// ============================================================================
// RELATION HELPERS
// ============================================================================

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn shadow_name(target: &str) -> String {
    format!("{target}_shadow")
}

/// Atomically replace `target` with its shadow relation. Readers never see
/// a half-built table: until the rename commits, the old relation stays
/// visible; afterwards the new one is.
pub fn swap_in(conn: &Connection, target: &str) -> Result<(), rusqlite::Error> {
    let shadow = shadow_name(target);
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS {target};
         ALTER TABLE {shadow} RENAME TO {target};"
    ))
}

/// Content fingerprint of a relation: SHA-256 over the named columns of
/// every row, in the given order. Two runs over the same bronze snapshot
/// must produce identical fingerprints for every silver and gold relation
/// (load timestamps excluded by listing only content columns).
pub fn fingerprint(
    conn: &Connection,
    relation: &str,
    columns: &[&str],
    order_by: &str,
) -> Result<String, rusqlite::Error> {
    let sql = format!(
        "SELECT {} FROM {relation} ORDER BY {order_by}",
        columns.join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let column_count = columns.len();

    let mut hasher = Sha256::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for i in 0..column_count {
            use rusqlite::types::ValueRef;
            match row.get_ref(i)? {
                ValueRef::Null => hasher.update(b"n"),
                ValueRef::Integer(v) => {
                    hasher.update(b"i");
                    hasher.update(v.to_le_bytes());
                }
                ValueRef::Real(v) => {
                    hasher.update(b"r");
                    hasher.update(v.to_le_bytes());
                }
                ValueRef::Text(t) => {
                    hasher.update(b"t");
                    hasher.update(t);
                }
                ValueRef::Blob(b) => {
                    hasher.update(b"b");
                    hasher.update(b);
                }
            }
            hasher.update(b"\x1f");
        }
        hasher.update(b"\x1e");
    }

    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// BRONZE SEEDING (demo stand-in for the ingestion collaborator)
// Reads one CSV per source relation from a directory; missing files are
// skipped so partial extracts still seed.
// ============================================================================

pub fn seed_bronze(conn: &Connection, dir: &Path) -> Result<usize> {
    setup_bronze(conn).context("failed to create bronze schema")?;

    let mut total = 0;
    total += seed_file(conn, &dir.join("crm_customers.csv"), insert_customer)?;
    total += seed_file(conn, &dir.join("crm_products.csv"), insert_product)?;
    total += seed_file(conn, &dir.join("crm_sales.csv"), insert_sale)?;
    total += seed_file(conn, &dir.join("erp_customers.csv"), insert_erp_customer)?;
    total += seed_file(conn, &dir.join("erp_locations.csv"), insert_erp_location)?;
    total += seed_file(conn, &dir.join("erp_categories.csv"), insert_erp_category)?;
    Ok(total)
}

fn seed_file<T, F>(conn: &Connection, path: &Path, insert: F) -> Result<usize>
where
    T: serde::de::DeserializeOwned,
    F: Fn(&Connection, &T) -> Result<(), rusqlite::Error>,
{
    if !path.exists() {
        return Ok(0);
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut count = 0;
    for result in rdr.deserialize() {
        let record: T =
            result.with_context(|| format!("failed to parse row in {}", path.display()))?;
        insert(conn, &record)
            .with_context(|| format!("failed to insert row from {}", path.display()))?;
        count += 1;
    }

    tracing::info!(file = %path.display(), rows = count, "seeded bronze relation");
    Ok(count)
}

fn insert_customer(conn: &Connection, r: &CustomerRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_crm_customers (
            customer_id, customer_number, first_name, last_name,
            marital_status, gender, created
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            r.customer_id,
            r.customer_number,
            r.first_name,
            r.last_name,
            r.marital_status,
            r.gender,
            r.created,
        ],
    )?;
    Ok(())
}

fn insert_product(conn: &Connection, r: &ProductRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_crm_products (
            product_id, product_key, product_name, cost, line, start_date, end_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            r.product_id,
            r.product_key,
            r.product_name,
            r.cost,
            r.line,
            r.start_date,
            r.end_date,
        ],
    )?;
    Ok(())
}

fn insert_sale(conn: &Connection, r: &SalesRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_crm_sales (
            order_number, product_key, customer_id, order_date, ship_date,
            due_date, sales, quantity, price
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            r.order_number,
            r.product_key,
            r.customer_id,
            r.order_date,
            r.ship_date,
            r.due_date,
            r.sales,
            r.quantity,
            r.price,
        ],
    )?;
    Ok(())
}

fn insert_erp_customer(conn: &Connection, r: &ErpCustomerRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_erp_customers (customer_id, birthdate, gender)
         VALUES (?1, ?2, ?3)",
        params![r.customer_id, r.birthdate, r.gender],
    )?;
    Ok(())
}

fn insert_erp_location(conn: &Connection, r: &ErpLocationRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_erp_locations (customer_id, country) VALUES (?1, ?2)",
        params![r.customer_id, r.country],
    )?;
    Ok(())
}

fn insert_erp_category(conn: &Connection, r: &ErpCategoryRaw) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO bronze_erp_categories (category_id, category, subcategory, maintenance)
         VALUES (?1, ?2, ?3, ?4)",
        params![r.category_id, r.category, r.subcategory, r.maintenance],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_bronze_creates_all_relations() {
        let conn = Connection::open_in_memory().unwrap();
        setup_bronze(&conn).unwrap();

        for table in [
            "bronze_crm_customers",
            "bronze_crm_products",
            "bronze_crm_sales",
            "bronze_erp_customers",
            "bronze_erp_locations",
            "bronze_erp_categories",
        ] {
            assert!(table_exists(&conn, table).unwrap(), "{table} missing");
        }
        assert!(!table_exists(&conn, "silver_customers").unwrap());
    }

    #[test]
    fn test_swap_in_replaces_target() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (v INTEGER);
             INSERT INTO t VALUES (1);
             CREATE TABLE t_shadow (v INTEGER);
             INSERT INTO t_shadow VALUES (2);",
        )
        .unwrap();

        swap_in(&conn, "t").unwrap();

        let v: i64 = conn.query_row("SELECT v FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(v, 2);
        assert!(!table_exists(&conn, "t_shadow").unwrap());
    }

    #[test]
    fn test_swap_in_works_without_existing_target() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE fresh_shadow (v INTEGER);")
            .unwrap();

        swap_in(&conn, "fresh").unwrap();
        assert!(table_exists(&conn, "fresh").unwrap());
    }

    #[test]
    fn test_fingerprint_is_content_sensitive() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE a (id INTEGER, name TEXT);
             INSERT INTO a VALUES (1, 'x'), (2, 'y');
             CREATE TABLE b (id INTEGER, name TEXT);
             INSERT INTO b VALUES (2, 'y'), (1, 'x');
             CREATE TABLE c (id INTEGER, name TEXT);
             INSERT INTO c VALUES (1, 'x'), (2, 'z');",
        )
        .unwrap();

        let fa = fingerprint(&conn, "a", &["id", "name"], "id").unwrap();
        let fb = fingerprint(&conn, "b", &["id", "name"], "id").unwrap();
        let fc = fingerprint(&conn, "c", &["id", "name"], "id").unwrap();

        // Same content in different physical order hashes identically
        assert_eq!(fa, fb);
        assert_ne!(fa, fc);
        assert_eq!(fa.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_null_from_empty() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE a (id INTEGER, name TEXT);
             INSERT INTO a VALUES (1, NULL);
             CREATE TABLE b (id INTEGER, name TEXT);
             INSERT INTO b VALUES (1, '');",
        )
        .unwrap();

        let fa = fingerprint(&conn, "a", &["id", "name"], "id").unwrap();
        let fb = fingerprint(&conn, "b", &["id", "name"], "id").unwrap();
        assert_ne!(fa, fb);
    }

    #[test]
    fn test_seed_bronze_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("crm_customers.csv"),
            "customer_id,customer_number,first_name,last_name,marital_status,gender,created\n\
             1,AW00000001,Jane,Doe,M,F,2021-01-01\n",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        let seeded = seed_bronze(&conn, dir.path()).unwrap();
        assert_eq!(seeded, 1);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM bronze_crm_customers", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
