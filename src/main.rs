use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use medallion_warehouse::{open_database, refresh, seed_bronze, validate_gold};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let db_path = database_path();

    match args.get(1).map(String::as_str) {
        Some("refresh") | None => run_refresh(&db_path),
        Some("seed") => {
            let dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
            run_seed(&db_path, &dir)
        }
        Some("check") => run_check(&db_path),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!("Usage: medallion-warehouse [refresh | seed <dir> | check]");
            std::process::exit(2);
        }
    }
}

fn database_path() -> PathBuf {
    env::var("WAREHOUSE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("warehouse.db"))
}

fn run_refresh(db_path: &Path) -> Result<()> {
    let conn = open_database(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    let summary = refresh(&conn)?;

    println!("Warehouse refresh {} complete", summary.run_id);
    for outcome in &summary.relations {
        if outcome.skipped {
            println!("  - {} skipped (bronze source missing)", outcome.relation);
        } else {
            println!("  ✓ {} ({} rows)", outcome.relation, outcome.rows);
        }
    }
    println!("Total: {} rows in {} ms", summary.total_rows(), summary.elapsed_ms);

    Ok(())
}

fn run_seed(db_path: &Path, dir: &Path) -> Result<()> {
    let conn = open_database(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    let seeded = seed_bronze(&conn, dir)?;
    println!("✓ Seeded {seeded} bronze rows from {}", dir.display());

    Ok(())
}

fn run_check(db_path: &Path) -> Result<()> {
    let conn = open_database(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    let report = validate_gold(&conn)?;
    println!("{}", report.summary());
    if !report.is_clean() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
