// Row types for all three warehouse layers.
// Raw (bronze) structs mirror the source extracts: every field optional,
// nothing validated. Silver structs are the cleaned projections, gold
// structs the denormalized dimensional shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// BRONZE (raw extracts, loosely typed)
// ============================================================================

/// CRM customer master row as extracted. Duplicates and blanks are expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRaw {
    pub customer_id: Option<i64>,
    pub customer_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    /// ISO date string; invalid values collapse to null downstream
    pub created: Option<String>,
}

/// CRM product row. `product_key` is the composite raw key the category id
/// and the real product key are carved out of. The source's own `end_date`
/// is carried but ignored: validity intervals are re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRaw {
    pub product_id: Option<i64>,
    pub product_key: Option<String>,
    pub product_name: Option<String>,
    pub cost: Option<f64>,
    pub line: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// CRM sales detail row. Dates arrive as compact YYYYMMDD integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRaw {
    pub order_number: Option<String>,
    pub product_key: Option<String>,
    pub customer_id: Option<i64>,
    pub order_date: Option<i64>,
    pub ship_date: Option<i64>,
    pub due_date: Option<i64>,
    pub sales: Option<f64>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

/// ERP customer demographics row. The id may carry a legacy prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpCustomerRaw {
    pub customer_id: Option<String>,
    pub birthdate: Option<String>,
    pub gender: Option<String>,
}

/// ERP location row. The id may contain separator dashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpLocationRaw {
    pub customer_id: Option<String>,
    pub country: Option<String>,
}

/// ERP product category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpCategoryRaw {
    pub category_id: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub maintenance: Option<String>,
}

// ============================================================================
// SILVER (validated, deduplicated)
// ============================================================================

/// One row per customer id, the newest version of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSilver {
    pub customer_id: i64,
    pub customer_number: String,
    pub first_name: String,
    pub last_name: String,
    pub marital_status: String,
    pub gender: String,
    pub created: Option<NaiveDate>,
}

/// One row per (product key, start date). `end_date` is derived by chaining:
/// the start date of the next version of the same key, null for the current
/// version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSilver {
    pub product_id: Option<i64>,
    pub category_id: String,
    pub product_key: String,
    pub product_name: String,
    pub cost: f64,
    pub line: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Sales detail with validated dates and reconciled sales/price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSilver {
    pub order_number: String,
    pub product_key: String,
    pub customer_id: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub quantity: i64,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpCustomerSilver {
    pub customer_id: String,
    pub birthdate: Option<NaiveDate>,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpLocationSilver {
    pub customer_id: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpCategorySilver {
    pub category_id: String,
    pub category: String,
    pub subcategory: String,
    pub maintenance: String,
}

// ============================================================================
// GOLD (denormalized, analytics-ready)
// ============================================================================

/// Customer dimension row. `customer_key` is the surrogate key, dense rank
/// by ascending customer id. ERP-sourced fields are null when no ERP row
/// matched the customer number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimCustomer {
    pub customer_key: i64,
    pub customer_id: i64,
    pub customer_number: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub marital_status: String,
    pub gender: String,
    pub birthdate: Option<NaiveDate>,
    pub created: Option<NaiveDate>,
}

/// Product dimension row. Only currently-active product versions (null
/// end date in silver) participate. `product_key` is the surrogate key,
/// dense rank by ascending (start date, product number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimProduct {
    pub product_key: i64,
    pub product_id: Option<i64>,
    pub product_number: String,
    pub product_name: String,
    pub category_id: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub maintenance: Option<String>,
    pub cost: f64,
    pub line: String,
    pub start_date: Option<NaiveDate>,
}

/// Sales fact row. Surrogate keys are resolved by business-key lookup;
/// an unmatched lookup leaves the key null rather than dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactSales {
    pub order_number: String,
    pub product_key: Option<i64>,
    pub customer_key: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub quantity: i64,
    pub price: Option<f64>,
}
