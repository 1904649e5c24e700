// Integrity validation - read-only checks over the gold relations.
// These checks report, they never gate: a completed load stands even when
// findings come back. Orphan facts in particular are an expected outcome
// of the left-preserving fact build, not a failure.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db;
use crate::error::PipelineError;

/// A surrogate key appearing more than once in a dimension.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateKey {
    pub relation: String,
    pub surrogate_key: i64,
    pub occurrences: i64,
}

/// A fact row referencing a surrogate key that no dimension row carries.
#[derive(Debug, Clone, Serialize)]
pub struct DanglingRef {
    pub order_number: String,
    pub dimension: String,
    pub surrogate_key: i64,
}

/// A fact row whose business-key lookup failed on either side.
#[derive(Debug, Clone, Serialize)]
pub struct OrphanFact {
    pub order_number: String,
    pub missing_product: bool,
    pub missing_customer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub generated_at: DateTime<Utc>,
    pub duplicate_keys: Vec<DuplicateKey>,
    pub dangling_refs: Vec<DanglingRef>,
    pub orphans: Vec<OrphanFact>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys.is_empty() && self.dangling_refs.is_empty() && self.orphans.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Integrity: {} duplicate keys, {} dangling references, {} orphan facts",
            self.duplicate_keys.len(),
            self.dangling_refs.len(),
            self.orphans.len()
        )
    }
}

/// Run all integrity checks against the gold relations.
pub fn validate_gold(conn: &Connection) -> Result<IntegrityReport, PipelineError> {
    for relation in ["gold_dim_customers", "gold_dim_products", "gold_fact_sales"] {
        if !db::table_exists(conn, relation)? {
            return Err(PipelineError::schema_missing(relation));
        }
    }

    let mut duplicate_keys = Vec::new();
    duplicate_keys.extend(find_duplicate_keys(conn, "gold_dim_customers", "customer_key")?);
    duplicate_keys.extend(find_duplicate_keys(conn, "gold_dim_products", "product_key")?);

    let mut dangling_refs = Vec::new();
    dangling_refs.extend(find_dangling_refs(
        conn,
        "gold_dim_customers",
        "customer_key",
    )?);
    dangling_refs.extend(find_dangling_refs(conn, "gold_dim_products", "product_key")?);

    let orphans = find_orphans(conn)?;

    Ok(IntegrityReport {
        generated_at: Utc::now(),
        duplicate_keys,
        dangling_refs,
        orphans,
    })
}

/// Check (a): no surrogate key value appears more than once per dimension.
fn find_duplicate_keys(
    conn: &Connection,
    dimension: &str,
    key_column: &str,
) -> Result<Vec<DuplicateKey>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {key_column}, COUNT(*) AS occurrences
         FROM {dimension}
         GROUP BY {key_column}
         HAVING COUNT(*) > 1
         ORDER BY {key_column}"
    ))?;
    let findings = stmt
        .query_map([], |row| {
            Ok(DuplicateKey {
                relation: dimension.to_string(),
                surrogate_key: row.get(0)?,
                occurrences: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(findings)
}

/// Check (b): every non-null surrogate key in the fact resolves to a
/// dimension row.
fn find_dangling_refs(
    conn: &Connection,
    dimension: &str,
    key_column: &str,
) -> Result<Vec<DanglingRef>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT f.order_number, f.{key_column}
         FROM gold_fact_sales f
         LEFT JOIN {dimension} d ON f.{key_column} = d.{key_column}
         WHERE f.{key_column} IS NOT NULL AND d.{key_column} IS NULL
         ORDER BY f.order_number"
    ))?;
    let findings = stmt
        .query_map([], |row| {
            Ok(DanglingRef {
                order_number: row.get(0)?,
                dimension: dimension.to_string(),
                surrogate_key: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(findings)
}

/// Check (c): enumerate fact rows where either surrogate key is null.
fn find_orphans(conn: &Connection) -> Result<Vec<OrphanFact>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT order_number, product_key IS NULL, customer_key IS NULL
         FROM gold_fact_sales
         WHERE product_key IS NULL OR customer_key IS NULL
         ORDER BY order_number",
    )?;
    let findings = stmt
        .query_map([], |row| {
            Ok(OrphanFact {
                order_number: row.get(0)?,
                missing_product: row.get(1)?,
                missing_customer: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(findings)
}
