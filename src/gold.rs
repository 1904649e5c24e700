// Gold layer builds - denormalized dimensions and the sales fact, written
// as materialized tables with explicit rebuild points (not live views), so
// surrogate keys and integrity checks are well-defined at a point in time.
//
// Surrogate keys are dense ranks over a total sort order; the natural
// business key is appended as the final tie-break column so assignment
// never depends on stable-sort accidents.

use rusqlite::{params, Connection};
use std::collections::HashMap;
use tracing::info;

use crate::db;
use crate::error::PipelineError;
use crate::model::{
    CustomerSilver, DimCustomer, DimProduct, ErpCategorySilver, ErpCustomerSilver,
    ErpLocationSilver, FactSales, ProductSilver, SalesSilver,
};
use crate::silver::{
    read_silver_customers, read_silver_erp_categories, read_silver_erp_customers,
    read_silver_erp_locations, read_silver_products, read_silver_sales, LoadOutcome,
};
use crate::standardize::NOT_AVAILABLE;

const GOLD_DIM_CUSTOMERS_COLUMNS: &str = "\
    customer_key INTEGER NOT NULL,
    customer_id INTEGER NOT NULL,
    customer_number TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    country TEXT,
    marital_status TEXT NOT NULL,
    gender TEXT NOT NULL,
    birthdate TEXT,
    created TEXT";

const GOLD_DIM_PRODUCTS_COLUMNS: &str = "\
    product_key INTEGER NOT NULL,
    product_id INTEGER,
    product_number TEXT NOT NULL,
    product_name TEXT NOT NULL,
    category_id TEXT NOT NULL,
    category TEXT,
    subcategory TEXT,
    maintenance TEXT,
    cost REAL NOT NULL,
    line TEXT NOT NULL,
    start_date TEXT";

const GOLD_FACT_SALES_COLUMNS: &str = "\
    order_number TEXT NOT NULL,
    product_key INTEGER,
    customer_key INTEGER,
    order_date TEXT,
    ship_date TEXT,
    due_date TEXT,
    sales REAL,
    quantity INTEGER NOT NULL,
    price REAL";

fn require_relations(conn: &Connection, relations: &[&str]) -> Result<(), PipelineError> {
    for relation in relations.iter().copied() {
        if !db::table_exists(conn, relation)? {
            return Err(PipelineError::schema_missing(relation));
        }
    }
    Ok(())
}

// ============================================================================
// CUSTOMER DIMENSION
// ============================================================================

/// Assemble the customer dimension: one row per silver customer, left
/// joined to ERP demographics and location by customer number. Field
/// priority: gender is CRM first, ERP second, N/A last (CRM wins when it
/// carries a real value); country and birthdate come from ERP only and
/// stay null without a match.
pub fn assemble_customer_dimension(
    mut customers: Vec<CustomerSilver>,
    demographics: &HashMap<String, ErpCustomerSilver>,
    locations: &HashMap<String, ErpLocationSilver>,
) -> Vec<DimCustomer> {
    customers.sort_by(|a, b| {
        a.customer_id
            .cmp(&b.customer_id)
            .then_with(|| a.customer_number.cmp(&b.customer_number))
    });

    customers
        .into_iter()
        .enumerate()
        .map(|(rank, c)| {
            let demo = demographics.get(&c.customer_number);
            let location = locations.get(&c.customer_number);

            let gender = if c.gender != NOT_AVAILABLE {
                c.gender.clone()
            } else {
                demo.map(|d| d.gender.clone())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
            };

            DimCustomer {
                customer_key: (rank + 1) as i64,
                customer_id: c.customer_id,
                customer_number: c.customer_number,
                first_name: c.first_name,
                last_name: c.last_name,
                country: location.map(|l| l.country.clone()),
                marital_status: c.marital_status,
                gender,
                birthdate: demo.and_then(|d| d.birthdate),
                created: c.created,
            }
        })
        .collect()
}

pub fn build_customer_dimension(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "gold_dim_customers";
    require_relations(
        conn,
        &["silver_customers", "silver_erp_customers", "silver_erp_locations"],
    )?;

    let customers = read_silver_customers(conn)?;
    let demographics: HashMap<String, ErpCustomerSilver> = read_silver_erp_customers(conn)?
        .into_iter()
        .map(|r| (r.customer_id.clone(), r))
        .collect();
    let locations: HashMap<String, ErpLocationSilver> = read_silver_erp_locations(conn)?
        .into_iter()
        .map(|r| (r.customer_id.clone(), r))
        .collect();

    let rows = assemble_customer_dimension(customers, &demographics, &locations);

    let tx = conn.unchecked_transaction()?;
    let shadow = db::shadow_name(TARGET);
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {shadow};
         CREATE TABLE {shadow} ({GOLD_DIM_CUSTOMERS_COLUMNS});"
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                customer_key, customer_id, customer_number, first_name, last_name,
                country, marital_status, gender, birthdate, created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.customer_key,
                row.customer_id,
                row.customer_number,
                row.first_name,
                row.last_name,
                row.country,
                row.marital_status,
                row.gender,
                row.birthdate.map(|d| d.to_string()),
                row.created.map(|d| d.to_string()),
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "gold build committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

// ============================================================================
// PRODUCT DIMENSION
// ============================================================================

/// Assemble the product dimension from currently-active product versions
/// only (null end date). Left join to ERP categories by category id;
/// surrogate keys rank by (start date, product number).
pub fn assemble_product_dimension(
    products: Vec<ProductSilver>,
    categories: &HashMap<String, ErpCategorySilver>,
) -> Vec<DimProduct> {
    let mut active: Vec<ProductSilver> = products
        .into_iter()
        .filter(|p| p.end_date.is_none())
        .collect();

    active.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.product_key.cmp(&b.product_key))
    });

    active
        .into_iter()
        .enumerate()
        .map(|(rank, p)| {
            let category = categories.get(&p.category_id);
            DimProduct {
                product_key: (rank + 1) as i64,
                product_id: p.product_id,
                product_number: p.product_key,
                product_name: p.product_name,
                category_id: p.category_id,
                category: category.map(|c| c.category.clone()),
                subcategory: category.map(|c| c.subcategory.clone()),
                maintenance: category.map(|c| c.maintenance.clone()),
                cost: p.cost,
                line: p.line,
                start_date: p.start_date,
            }
        })
        .collect()
}

pub fn build_product_dimension(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "gold_dim_products";
    require_relations(conn, &["silver_products", "silver_erp_categories"])?;

    let products = read_silver_products(conn)?;
    let categories: HashMap<String, ErpCategorySilver> = read_silver_erp_categories(conn)?
        .into_iter()
        .map(|r| (r.category_id.clone(), r))
        .collect();

    let rows = assemble_product_dimension(products, &categories);

    let tx = conn.unchecked_transaction()?;
    let shadow = db::shadow_name(TARGET);
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {shadow};
         CREATE TABLE {shadow} ({GOLD_DIM_PRODUCTS_COLUMNS});"
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                product_key, product_id, product_number, product_name, category_id,
                category, subcategory, maintenance, cost, line, start_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.product_key,
                row.product_id,
                row.product_number,
                row.product_name,
                row.category_id,
                row.category,
                row.subcategory,
                row.maintenance,
                row.cost,
                row.line,
                row.start_date.map(|d| d.to_string()),
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "gold build committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

// ============================================================================
// SALES FACT
// ============================================================================

/// Resolve each sales row's business keys against the dimension indexes.
/// Left-preserving on the fact side: a missing dimension row yields a null
/// surrogate key, never a dropped fact. Orphan detection belongs to the
/// integrity validator.
pub fn assemble_sales_fact(
    sales: Vec<SalesSilver>,
    products_by_number: &HashMap<String, i64>,
    customers_by_id: &HashMap<i64, i64>,
) -> Vec<FactSales> {
    sales
        .into_iter()
        .map(|s| FactSales {
            product_key: products_by_number.get(&s.product_key).copied(),
            customer_key: s.customer_id.and_then(|id| customers_by_id.get(&id).copied()),
            order_number: s.order_number,
            order_date: s.order_date,
            ship_date: s.ship_date,
            due_date: s.due_date,
            sales: s.sales,
            quantity: s.quantity,
            price: s.price,
        })
        .collect()
}

pub fn build_sales_fact(conn: &Connection) -> Result<LoadOutcome, PipelineError> {
    const TARGET: &str = "gold_fact_sales";
    require_relations(
        conn,
        &["silver_sales", "gold_dim_customers", "gold_dim_products"],
    )?;

    let sales = read_silver_sales(conn)?;
    let products_by_number = read_product_index(conn)?;
    let customers_by_id = read_customer_index(conn)?;

    let rows = assemble_sales_fact(sales, &products_by_number, &customers_by_id);

    let tx = conn.unchecked_transaction()?;
    let shadow = db::shadow_name(TARGET);
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {shadow};
         CREATE TABLE {shadow} ({GOLD_FACT_SALES_COLUMNS});"
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {shadow} (
                order_number, product_key, customer_key, order_date, ship_date,
                due_date, sales, quantity, price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.order_number,
                row.product_key,
                row.customer_key,
                row.order_date.map(|d| d.to_string()),
                row.ship_date.map(|d| d.to_string()),
                row.due_date.map(|d| d.to_string()),
                row.sales,
                row.quantity,
                row.price,
            ])?;
        }
    }
    db::swap_in(&tx, TARGET)?;
    tx.commit()?;

    info!(target = TARGET, rows = rows.len(), "gold build committed");
    Ok(LoadOutcome::loaded(TARGET, rows.len()))
}

/// Business-key index over the product dimension: product number -> key.
fn read_product_index(conn: &Connection) -> Result<HashMap<String, i64>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT product_number, product_key FROM gold_dim_products")?;
    let index = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(index)
}

/// Business-key index over the customer dimension: customer id -> key.
fn read_customer_index(conn: &Connection) -> Result<HashMap<i64, i64>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT customer_id, customer_key FROM gold_dim_customers")?;
    let index = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(index)
}

/// Read the gold customer dimension back (diagnostics and tests).
pub fn read_dim_customers(conn: &Connection) -> Result<Vec<DimCustomer>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT customer_key, customer_id, customer_number, first_name, last_name,
                country, marital_status, gender, birthdate, created
         FROM gold_dim_customers
         ORDER BY customer_key",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let birthdate: Option<String> = row.get(8)?;
            let created: Option<String> = row.get(9)?;
            Ok(DimCustomer {
                customer_key: row.get(0)?,
                customer_id: row.get(1)?,
                customer_number: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                country: row.get(5)?,
                marital_status: row.get(6)?,
                gender: row.get(7)?,
                birthdate: birthdate.as_deref().and_then(crate::validate::iso_date),
                created: created.as_deref().and_then(crate::validate::iso_date),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Read the gold fact back (diagnostics and tests).
pub fn read_fact_sales(conn: &Connection) -> Result<Vec<FactSales>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT order_number, product_key, customer_key, order_date, ship_date,
                due_date, sales, quantity, price
         FROM gold_fact_sales
         ORDER BY order_number",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let order: Option<String> = row.get(3)?;
            let ship: Option<String> = row.get(4)?;
            let due: Option<String> = row.get(5)?;
            Ok(FactSales {
                order_number: row.get(0)?,
                product_key: row.get(1)?,
                customer_key: row.get(2)?,
                order_date: order.as_deref().and_then(crate::validate::iso_date),
                ship_date: ship.as_deref().and_then(crate::validate::iso_date),
                due_date: due.as_deref().and_then(crate::validate::iso_date),
                sales: row.get(6)?,
                quantity: row.get(7)?,
                price: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
