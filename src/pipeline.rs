// Pipeline orchestration - the single parameterless refresh.
//
// Silver loads run first, each committing independently; the gold builds
// never start before every silver load has committed. The run aborts on
// the first entity failure with that failure's detail preserved; entities
// committed before the failure point stay committed.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::gold;
use crate::silver::{self, LoadOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub relations: Vec<LoadOutcome>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.relations.iter().map(|r| r.rows).sum()
    }
}

/// Full warehouse refresh: every silver and gold relation rebuilt from the
/// current bronze snapshot. Idempotent - rerunning against unchanged bronze
/// input reproduces identical relation content.
pub fn refresh(conn: &Connection) -> Result<RunSummary, PipelineError> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let clock = Instant::now();
    info!(%run_id, "warehouse refresh started");

    let mut relations = Vec::with_capacity(9);

    // Silver layer
    relations.push(run_stage("customers", silver::load_customers(conn))?);
    relations.push(run_stage("products", silver::load_products(conn))?);
    relations.push(run_stage("sales", silver::load_sales(conn))?);
    relations.push(run_stage("erp_customers", silver::load_erp_customers(conn))?);
    relations.push(run_stage("erp_locations", silver::load_erp_locations(conn))?);
    relations.push(run_stage("erp_categories", silver::load_erp_categories(conn))?);

    // Gold layer - dimensions before the fact, which looks them up
    relations.push(run_stage("dim_customers", gold::build_customer_dimension(conn))?);
    relations.push(run_stage("dim_products", gold::build_product_dimension(conn))?);
    relations.push(run_stage("fact_sales", gold::build_sales_fact(conn))?);

    let summary = RunSummary {
        run_id,
        started_at,
        elapsed_ms: clock.elapsed().as_millis() as u64,
        relations,
    };
    info!(
        %run_id,
        elapsed_ms = summary.elapsed_ms,
        rows = summary.total_rows(),
        "warehouse refresh complete"
    );
    Ok(summary)
}

fn run_stage(
    entity: &'static str,
    result: Result<LoadOutcome, PipelineError>,
) -> Result<LoadOutcome, PipelineError> {
    result.map_err(|cause| {
        error!(entity, %cause, "pipeline run aborted");
        PipelineError::entity(entity, cause)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::gold::{read_dim_customers, read_fact_sales};

    /// Bronze snapshot exercising dedup, standardization, key splitting,
    /// reconciliation, the ERP joins, and an orphan sale.
    fn seed(conn: &Connection) {
        db::setup_bronze(conn).unwrap();
        conn.execute_batch(
            "INSERT INTO bronze_crm_customers VALUES
                (7, 'AW00000007', 'Jane', 'Doe', 'S', ' m ', '2021-01-01'),
                (7, 'AW00000007', 'Jane', 'Doe', 'M', 'F', '2022-06-01'),
                (8, 'AW00000008', 'John', 'Roe', 'M', 'X', '2020-02-02');

             INSERT INTO bronze_crm_products VALUES
                (1, 'AC-HE-HL-U509', 'Sport Helmet', 12.0, 'S', '2020-01-01', NULL),
                (2, 'AC-HE-HL-U509', 'Sport Helmet v2', 14.0, 'S', '2021-01-01', NULL),
                (3, 'CO-RF-FR-R92B', 'Road Frame', 100.0, 'R', '2020-06-01', NULL);

             INSERT INTO bronze_crm_sales VALUES
                ('SO1', 'HL-U509', 7, 20210115, 20210117, 0, 999.0, 3, 10.0),
                ('SO2', 'FR-R92B', 8, 20210201, NULL, 20210210, NULL, 5, -2.0),
                ('SO3', 'GHOST-KEY', 99, 20210301, NULL, NULL, 20.0, 2, 10.0);

             INSERT INTO bronze_erp_customers VALUES
                ('NASAW00000007', '1980-05-01', 'Female'),
                ('AW00000008', '2030-01-01', NULL);

             INSERT INTO bronze_erp_locations VALUES
                ('AW-00000007', 'us'),
                ('AW-00000008', 'DE');

             INSERT INTO bronze_erp_categories VALUES
                ('AC_HE', 'Accessories', 'Helmets', 'No'),
                ('CO_RF', 'Components', 'Road Frames', 'Yes');",
        )
        .unwrap();
    }

    const SILVER_SALES_CONTENT: &[&str] = &[
        "order_number",
        "product_key",
        "customer_id",
        "order_date",
        "ship_date",
        "due_date",
        "sales",
        "quantity",
        "price",
    ];

    #[test]
    fn test_refresh_builds_all_relations() {
        let conn = Connection::open_in_memory().unwrap();
        seed(&conn);

        let summary = refresh(&conn).unwrap();
        assert_eq!(summary.relations.len(), 9);
        assert!(summary.relations.iter().all(|r| !r.skipped));

        for relation in [
            "silver_customers",
            "silver_products",
            "silver_sales",
            "silver_erp_customers",
            "silver_erp_locations",
            "silver_erp_categories",
            "gold_dim_customers",
            "gold_dim_products",
            "gold_fact_sales",
        ] {
            assert!(db::table_exists(&conn, relation).unwrap(), "{relation} missing");
        }
    }

    #[test]
    fn test_gold_dimension_content() {
        let conn = Connection::open_in_memory().unwrap();
        seed(&conn);
        refresh(&conn).unwrap();

        let dims = read_dim_customers(&conn).unwrap();
        assert_eq!(dims.len(), 2);

        // Customer 7: deduplicated to the 2022 version, CRM gender wins
        let c7 = &dims[0];
        assert_eq!(c7.customer_key, 1);
        assert_eq!(c7.customer_id, 7);
        assert_eq!(c7.gender, "FEMALE");
        assert_eq!(c7.country.as_deref(), Some("United States"));
        assert_eq!(c7.birthdate.map(|d| d.to_string()), Some("1980-05-01".into()));

        // Customer 8: CRM gender unknown, ERP has none either; future
        // birthdate was nulled; country joined from ERP location
        let c8 = &dims[1];
        assert_eq!(c8.customer_key, 2);
        assert_eq!(c8.gender, "N/A");
        assert_eq!(c8.birthdate, None);
        assert_eq!(c8.country.as_deref(), Some("Germany"));
    }

    #[test]
    fn test_fact_reconciliation_and_orphans() {
        let conn = Connection::open_in_memory().unwrap();
        seed(&conn);
        refresh(&conn).unwrap();

        let facts = read_fact_sales(&conn).unwrap();
        assert_eq!(facts.len(), 3);

        // SO1: inconsistent sales recomputed, due date 0 collapsed to null
        assert_eq!(facts[0].sales, Some(30.0));
        assert_eq!(facts[0].due_date, None);
        assert!(facts[0].product_key.is_some());
        assert!(facts[0].customer_key.is_some());

        // SO2: negative price reconciled through |price|
        assert_eq!(facts[1].sales, Some(10.0));
        assert_eq!(facts[1].price, Some(2.0));

        // SO3: unknown product and customer - retained as an orphan
        assert_eq!(facts[2].order_number, "SO3");
        assert_eq!(facts[2].product_key, None);
        assert_eq!(facts[2].customer_key, None);

        // Only the latest product versions made the dimension
        let product_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM gold_dim_products", [], |r| r.get(0))
            .unwrap();
        assert_eq!(product_count, 2);

        // The integrity validator flags the orphan without failing
        let report = crate::integrity::validate_gold(&conn).unwrap();
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].order_number, "SO3");
        assert!(report.duplicate_keys.is_empty());
    }

    #[test]
    fn test_effective_date_chain_in_silver() {
        let conn = Connection::open_in_memory().unwrap();
        seed(&conn);
        refresh(&conn).unwrap();

        let rows: Vec<(String, Option<String>, Option<String>)> = {
            let mut stmt = conn
                .prepare(
                    "SELECT product_key, start_date, end_date FROM silver_products
                     WHERE product_key = 'HL-U509' ORDER BY start_date",
                )
                .unwrap();
            stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap()
        };

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].2.as_deref(), Some("2021-01-01"));
        assert_eq!(rows[1].2, None);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let conn = db::open_database(&dir.path().join("warehouse.db")).unwrap();
        seed(&conn);

        refresh(&conn).unwrap();
        let first = db::fingerprint(
            &conn,
            "silver_sales",
            SILVER_SALES_CONTENT,
            "order_number",
        )
        .unwrap();
        let first_dim = db::fingerprint(
            &conn,
            "gold_dim_customers",
            &["customer_key", "customer_id", "gender", "country"],
            "customer_key",
        )
        .unwrap();

        refresh(&conn).unwrap();
        let second = db::fingerprint(
            &conn,
            "silver_sales",
            SILVER_SALES_CONTENT,
            "order_number",
        )
        .unwrap();
        let second_dim = db::fingerprint(
            &conn,
            "gold_dim_customers",
            &["customer_key", "customer_id", "gender", "country"],
            "customer_key",
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(first_dim, second_dim);
    }

    #[test]
    fn test_missing_bronze_skips_silver_but_fails_gold() {
        let conn = Connection::open_in_memory().unwrap();
        // No bronze relations at all: silver loads skip, the first gold
        // build aborts the run with the missing relation named
        let err = refresh(&conn).unwrap_err();
        match err {
            PipelineError::EntityLoad { entity, source } => {
                assert_eq!(entity, "dim_customers");
                assert!(matches!(*source, PipelineError::SchemaMissing { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_completed_loads_stay_committed_after_abort() {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_bronze(&conn).unwrap();
        // Only customer bronze data; drop an ERP source so the customer
        // dimension build fails after silver committed
        conn.execute(
            "INSERT INTO bronze_crm_customers VALUES
                (1, 'AW00000001', 'A', 'B', 'S', 'M', '2020-01-01')",
            [],
        )
        .unwrap();
        conn.execute_batch("DROP TABLE bronze_erp_customers;").unwrap();

        let err = refresh(&conn).unwrap_err();
        assert!(matches!(err, PipelineError::EntityLoad { .. }));

        // The silver customer load committed before the abort and stands
        assert!(db::table_exists(&conn, "silver_customers").unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM silver_customers", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
