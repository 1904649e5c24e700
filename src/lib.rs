// Medallion Sales Warehouse - Core Library
// Bronze -> Silver -> Gold transformation pipeline over SQLite

pub mod db;
pub mod dedupe;
pub mod effective;
pub mod error;
pub mod gold;
pub mod integrity;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod silver;
pub mod standardize;
pub mod validate;

// Re-export commonly used types
pub use db::{fingerprint, open_database, seed_bronze, setup_bronze};
pub use error::PipelineError;
pub use integrity::{validate_gold, DanglingRef, DuplicateKey, IntegrityReport, OrphanFact};
pub use model::{
    CustomerRaw, CustomerSilver, DimCustomer, DimProduct, ErpCategoryRaw, ErpCategorySilver,
    ErpCustomerRaw, ErpCustomerSilver, ErpLocationRaw, ErpLocationSilver, FactSales, ProductRaw,
    ProductSilver, SalesRaw, SalesSilver,
};
pub use pipeline::{refresh, RunSummary};
pub use silver::LoadOutcome;
pub use standardize::{CodeMap, Fallback, COUNTRY, GENDER, MARITAL_STATUS, PRODUCT_LINE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
