// Silver layer loads - one full-refresh load per source entity.
//
// Each load is an independent unit with its own commit point: read bronze,
// transform in memory, build a shadow relation, swap it in atomically.
// Readers never observe an empty or half-built relation, and a failed load
// leaves the previous version of its relation untouched.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Transaction};
use tracing::{info, warn};

use crate::db;
use crate::dedupe::latest_per_key;
use crate::effective::chain_end_dates;
use crate::error::PipelineError;
use crate::model::{
    CustomerRaw, CustomerSilver, ErpCategoryRaw, ErpCategorySilver, ErpCustomerRaw,
    ErpCustomerSilver, ErpLocationRaw, ErpLocationSilver, ProductRaw, ProductSilver, SalesRaw,
    SalesSilver,
};
use crate::reconcile::reconcile;
use crate::standardize::{COUNTRY, GENDER, MARITAL_STATUS, PRODUCT_LINE};
use crate::validate::{birthdate, compact_date_i64, iso_date};

/// Result of one entity load.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadOutcome {
    pub relation: String,
    pub rows: usize,
    pub skipped: bool,
}

impl LoadOutcome {
    pub fn loaded(relation: &str, rows: usize) -> Self {
        LoadOutcome {
            relation: relation.to_string(),
            rows,
            skipped: false,
        }
    }

    pub fn skipped(relation: &str) -> Self {
        LoadOutcome {
            relation: relation.to_string(),
            rows: 0,
            skipped: true,
        }
    }
}

// ============================================================================
// SCHEMAS
// The four fixed-schema relations keep a stable column set across runs.
// Products and sales carry derived columns plus a load timestamp, and are
// recreated wholesale on every run.
// ============================================================================

const SILVER_CUSTOMERS_COLUMNS: &str = "\
    customer_id INTEGER NOT NULL,
    customer_number TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    marital_status TEXT NOT NULL,
    gender TEXT NOT NULL,
    created TEXT";

const SILVER_PRODUCTS_COLUMNS: &str = "\
    product_id INTEGER,
    category_id TEXT NOT NULL,
    product_key TEXT NOT NULL,
    product_name TEXT NOT NULL,
    cost REAL NOT NULL,
    line TEXT NOT NULL,
    start_date TEXT,
    end_date TEXT,
    dwh_create_date TEXT NOT NULL";

const SILVER_SALES_COLUMNS: &str = "\
    order_number TEXT NOT NULL,
    product_key TEXT NOT NULL,
    customer_id INTEGER,
    order_date TEXT,
    ship_date TEXT,
    due_date TEXT,
    sales REAL,
    quantity INTEGER NOT NULL,
    price REAL,
    dwh_create_date TEXT NOT NULL";

const SILVER_ERP_CUSTOMERS_COLUMNS: &str = "\
    customer_id TEXT NOT NULL,
    birthdate TEXT,
    gender TEXT NOT NULL";

const SILVER_ERP_LOCATIONS_COLUMNS: &str = "\
    customer_id TEXT NOT NULL,
    country TEXT NOT NULL";

const SILVER_ERP_CATEGORIES_COLUMNS: &str = "\
    category_id TEXT NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL,
    maintenance TEXT NOT NULL";

/// Start a shadow build: open a transaction and create an empty shadow
/// relation for `target`. Leftover shadows from a crashed run are dropped.
fn begin_shadow<'c>(
    conn: &'c Connection,
    target: &str,
    columns: &str,
) -> Result<(Transaction<'c>, String), rusqlite::Error> {
    let tx = conn.unchecked_transaction()?;
    let shadow = db::shadow_name(target);
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {shadow};
         CREATE TABLE {shadow} ({columns});"
    ))?;
    Ok((tx, shadow))
}

fn date_text(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.to_string())
}

// ============================================================================
// CUSTOMERS
// ============================================================================

/// Deduplicate CRM customers to the newest record per id, trim names,
/// standardize marital status and gender.
pub fn transform_customers(raw: Vec<CustomerRaw>) -> Vec<CustomerSilver> {
    let current = latest_per_key(
        raw,
        |r| r.customer_id,
        |r| r.created.as_deref().and_then(iso_date),
    );

    current
        .into_iter()
        .filter_map(|r| {
            Some(CustomerSilver {
                customer_id: r.customer_id?,
                customer_number: r.customer_number.map(|s| s.trim().to_string()).unwrap_or_default(),
                first_name: r.first_name.map(|s| s.trim().to_string()).unwrap_or_default(),
                last_name: r.last_name.map(|s| s.trim().to_string()).unwrap_or_default(),
                marital_status: MARITAL_STATUS.resolve(r.marital_status.as_deref()),
                gender: GENDER.resolve(r.gender.as_deref()),
                created: r.created.as_deref().and_then(iso_date),
            })
        })
        .collect()
}

pub fn load_customers(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_customers";
    const SOURCE: &str = "bronze_crm_customers";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_customers(conn)?;
    let rows = transform_customers(raw);

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_CUSTOMERS_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                customer_id, customer_number, first_name, last_name,
                marital_status, gender, created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.customer_id,
                row.customer_number,
                row.first_name,
                row.last_name,
                row.marital_status,
                row.gender,
                date_text(row.created),
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_customers(conn: &Connection) -> Result<Vec<CustomerRaw>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT customer_id, customer_number, first_name, last_name,
                marital_status, gender, created
         FROM bronze_crm_customers",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CustomerRaw {
                customer_id: row.get(0)?,
                customer_number: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                marital_status: row.get(4)?,
                gender: row.get(5)?,
                created: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// PRODUCTS
// ============================================================================

/// Category id: first five characters of the raw composite key with the
/// separator normalized to underscore, matching the ERP category ids.
fn derive_category_id(raw_key: &str) -> String {
    raw_key
        .chars()
        .take(5)
        .map(|c| if c == '-' { '_' } else { c })
        .collect()
}

/// Product key proper: everything after the category prefix and separator.
fn derive_product_key(raw_key: &str) -> String {
    raw_key.chars().skip(6).collect()
}

/// Split composite keys, standardize the product line, validate dates and
/// derive the effective-date chain.
pub fn transform_products(raw: Vec<ProductRaw>) -> Vec<ProductSilver> {
    let mut rows: Vec<ProductSilver> = raw
        .into_iter()
        .filter_map(|r| {
            let raw_key = r.product_key?;
            let raw_key = raw_key.trim();
            Some(ProductSilver {
                product_id: r.product_id,
                category_id: derive_category_id(raw_key),
                product_key: derive_product_key(raw_key),
                product_name: r.product_name.map(|s| s.trim().to_string()).unwrap_or_default(),
                cost: r.cost.unwrap_or(0.0),
                line: PRODUCT_LINE.resolve(r.line.as_deref()),
                start_date: r.start_date.as_deref().and_then(iso_date),
                // Source end dates are unreliable; re-derived below
                end_date: None,
            })
        })
        .collect();

    chain_end_dates(&mut rows);
    rows
}

pub fn load_products(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_products";
    const SOURCE: &str = "bronze_crm_products";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_products(conn)?;
    let rows = transform_products(raw);
    let load_stamp = Utc::now().to_rfc3339();

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_PRODUCTS_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                product_id, category_id, product_key, product_name, cost,
                line, start_date, end_date, dwh_create_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.product_id,
                row.category_id,
                row.product_key,
                row.product_name,
                row.cost,
                row.line,
                date_text(row.start_date),
                date_text(row.end_date),
                load_stamp,
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_products(conn: &Connection) -> Result<Vec<ProductRaw>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT product_id, product_key, product_name, cost, line, start_date, end_date
         FROM bronze_crm_products",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ProductRaw {
                product_id: row.get(0)?,
                product_key: row.get(1)?,
                product_name: row.get(2)?,
                cost: row.get(3)?,
                line: row.get(4)?,
                start_date: row.get(5)?,
                end_date: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// SALES
// ============================================================================

/// Validate compact dates and reconcile sales/price. Rows are never
/// dropped here: a sales record with a broken key still reaches the fact
/// builder, which resolves it to an orphan rather than losing it.
pub fn transform_sales(raw: Vec<SalesRaw>) -> Vec<SalesSilver> {
    raw.into_iter()
        .map(|r| {
            let quantity = r.quantity.unwrap_or(0);
            let (sales, price) = reconcile(r.sales, quantity, r.price);
            SalesSilver {
                order_number: r.order_number.map(|s| s.trim().to_string()).unwrap_or_default(),
                product_key: r.product_key.map(|s| s.trim().to_string()).unwrap_or_default(),
                customer_id: r.customer_id,
                order_date: compact_date_i64(r.order_date),
                ship_date: compact_date_i64(r.ship_date),
                due_date: compact_date_i64(r.due_date),
                sales,
                quantity,
                price,
            }
        })
        .collect()
}

pub fn load_sales(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_sales";
    const SOURCE: &str = "bronze_crm_sales";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_sales(conn)?;
    let rows = transform_sales(raw);
    let load_stamp = Utc::now().to_rfc3339();

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_SALES_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                order_number, product_key, customer_id, order_date, ship_date,
                due_date, sales, quantity, price, dwh_create_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.order_number,
                row.product_key,
                row.customer_id,
                date_text(row.order_date),
                date_text(row.ship_date),
                date_text(row.due_date),
                row.sales,
                row.quantity,
                row.price,
                load_stamp,
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_sales(conn: &Connection) -> Result<Vec<SalesRaw>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT order_number, product_key, customer_id, order_date, ship_date,
                due_date, sales, quantity, price
         FROM bronze_crm_sales",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SalesRaw {
                order_number: row.get(0)?,
                product_key: row.get(1)?,
                customer_id: row.get(2)?,
                order_date: row.get(3)?,
                ship_date: row.get(4)?,
                due_date: row.get(5)?,
                sales: row.get(6)?,
                quantity: row.get(7)?,
                price: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// ERP CUSTOMER DEMOGRAPHICS
// ============================================================================

/// Legacy ids arrive prefixed; strip the prefix so the id lines up with
/// the CRM customer number for the dimension join.
const ERP_CUSTOMER_ID_PREFIX: &str = "NAS";

pub fn transform_erp_customers(raw: Vec<ErpCustomerRaw>, today: NaiveDate) -> Vec<ErpCustomerSilver> {
    raw.into_iter()
        .filter_map(|r| {
            let id = r.customer_id?;
            let id = id.trim();
            let id = id.strip_prefix(ERP_CUSTOMER_ID_PREFIX).unwrap_or(id);
            Some(ErpCustomerSilver {
                customer_id: id.to_string(),
                birthdate: birthdate(r.birthdate.as_deref().and_then(iso_date), today),
                gender: GENDER.resolve(r.gender.as_deref()),
            })
        })
        .collect()
}

pub fn load_erp_customers(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_erp_customers";
    const SOURCE: &str = "bronze_erp_customers";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_erp_customers(conn)?;
    let rows = transform_erp_customers(raw, Utc::now().date_naive());

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_ERP_CUSTOMERS_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (customer_id, birthdate, gender) VALUES (?1, ?2, ?3)"
        ))?;
        for row in &rows {
            stmt.execute(params![row.customer_id, date_text(row.birthdate), row.gender])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_erp_customers(conn: &Connection) -> Result<Vec<ErpCustomerRaw>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT customer_id, birthdate, gender FROM bronze_erp_customers")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ErpCustomerRaw {
                customer_id: row.get(0)?,
                birthdate: row.get(1)?,
                gender: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// ERP LOCATIONS
// ============================================================================

pub fn transform_erp_locations(raw: Vec<ErpLocationRaw>) -> Vec<ErpLocationSilver> {
    raw.into_iter()
        .filter_map(|r| {
            let id: String = r.customer_id?.chars().filter(|c| *c != '-').collect();
            Some(ErpLocationSilver {
                customer_id: id.trim().to_string(),
                country: COUNTRY.resolve(r.country.as_deref()),
            })
        })
        .collect()
}

pub fn load_erp_locations(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_erp_locations";
    const SOURCE: &str = "bronze_erp_locations";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_erp_locations(conn)?;
    let rows = transform_erp_locations(raw);

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_ERP_LOCATIONS_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (customer_id, country) VALUES (?1, ?2)"
        ))?;
        for row in &rows {
            stmt.execute(params![row.customer_id, row.country])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_erp_locations(conn: &Connection) -> Result<Vec<ErpLocationRaw>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT customer_id, country FROM bronze_erp_locations")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ErpLocationRaw {
                customer_id: row.get(0)?,
                country: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// ERP CATEGORIES (pass-through)
// ============================================================================

pub fn transform_erp_categories(raw: Vec<ErpCategoryRaw>) -> Vec<ErpCategorySilver> {
    raw.into_iter()
        .map(|r| ErpCategorySilver {
            category_id: r.category_id.unwrap_or_default(),
            category: r.category.unwrap_or_default(),
            subcategory: r.subcategory.unwrap_or_default(),
            maintenance: r.maintenance.unwrap_or_default(),
        })
        .collect()
}

pub fn load_erp_categories(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "silver_erp_categories";
    const SOURCE: &str = "bronze_erp_categories";

    if !db::table_exists(conn, SOURCE)? {
        warn!(source = SOURCE, target = TARGET, "bronze relation missing, skipping load");
        return Ok(LoadOutcome::skipped(TARGET));
    }

    let raw = read_bronze_erp_categories(conn)?;
    let rows = transform_erp_categories(raw);

    let (tx, shadow) = begin_shadow(conn, TARGET, SILVER_ERP_CATEGORIES_COLUMNS)?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (category_id, category, subcategory, maintenance)
             VALUES (?1, ?2, ?3, ?4)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.category_id,
                row.category,
                row.subcategory,
                row.maintenance
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "silver load committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

fn read_bronze_erp_categories(conn: &Connection) -> Result<Vec<ErpCategoryRaw>, rusqlite::Error> {
    let mut stmt = conn
        .prepare("SELECT category_id, category, subcategory, maintenance FROM bronze_erp_categories")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ErpCategoryRaw {
                category_id: row.get(0)?,
                category: row.get(1)?,
                subcategory: row.get(2)?,
                maintenance: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// SILVER READERS (used by the gold builders and tests)
// ============================================================================

fn text_date(raw: Option<String>) -> Option<NaiveDate> {
    raw.as_deref().and_then(iso_date)
}

pub fn read_silver_customers(conn: &Connection) -> Result<Vec<CustomerSilver>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT customer_id, customer_number, first_name, last_name,
                marital_status, gender, created
         FROM silver_customers",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let created: Option<String> = row.get(6)?;
            Ok(CustomerSilver {
                customer_id: row.get(0)?,
                customer_number: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                marital_status: row.get(4)?,
                gender: row.get(5)?,
                created: text_date(created),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_silver_products(conn: &Connection) -> Result<Vec<ProductSilver>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT product_id, category_id, product_key, product_name, cost,
                line, start_date, end_date
         FROM silver_products",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let start: Option<String> = row.get(6)?;
            let end: Option<String> = row.get(7)?;
            Ok(ProductSilver {
                product_id: row.get(0)?,
                category_id: row.get(1)?,
                product_key: row.get(2)?,
                product_name: row.get(3)?,
                cost: row.get(4)?,
                line: row.get(5)?,
                start_date: text_date(start),
                end_date: text_date(end),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_silver_sales(conn: &Connection) -> Result<Vec<SalesSilver>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT order_number, product_key, customer_id, order_date, ship_date,
                due_date, sales, quantity, price
         FROM silver_sales",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let order: Option<String> = row.get(3)?;
            let ship: Option<String> = row.get(4)?;
            let due: Option<String> = row.get(5)?;
            Ok(SalesSilver {
                order_number: row.get(0)?,
                product_key: row.get(1)?,
                customer_id: row.get(2)?,
                order_date: text_date(order),
                ship_date: text_date(ship),
                due_date: text_date(due),
                sales: row.get(6)?,
                quantity: row.get(7)?,
                price: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_silver_erp_customers(
    conn: &Connection,
) -> Result<Vec<ErpCustomerSilver>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT customer_id, birthdate, gender FROM silver_erp_customers")?;
    let rows = stmt
        .query_map([], |row| {
            let bdate: Option<String> = row.get(1)?;
            Ok(ErpCustomerSilver {
                customer_id: row.get(0)?,
                birthdate: text_date(bdate),
                gender: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_silver_erp_locations(
    conn: &Connection,
) -> Result<Vec<ErpLocationSilver>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT customer_id, country FROM silver_erp_locations")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ErpLocationSilver {
                customer_id: row.get(0)?,
                country: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_silver_erp_categories(
    conn: &Connection,
) -> Result<Vec<ErpCategorySilver>, rusqlite::Error> {
    let mut stmt = conn
        .prepare("SELECT category_id, category, subcategory, maintenance FROM silver_erp_categories")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ErpCategorySilver {
                category_id: row.get(0)?,
                category: row.get(1)?,
                subcategory: row.get(2)?,
                maintenance: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
