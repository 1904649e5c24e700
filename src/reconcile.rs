// Sales/price reconciliation - recompute derived numeric fields when the
// source values are missing or inconsistent.
//
// The rules, in order (order matters - price uses the reconciled sales):
//   sales = quantity * |price|   if sales is null, <= 0, or inconsistent
//   price = sales / quantity     if price is null or negative (quantity 0
//                                guarded to null, never a division fault)

/// Reconcile a sales record's (sales, price) pair against its quantity.
/// Returns the corrected (sales, price).
pub fn reconcile(
    sales: Option<f64>,
    quantity: i64,
    price: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    // The amount the record should carry if the stored sales is unusable.
    // |price| deliberately: a negative unit price is a sign error upstream,
    // not a negative sale.
    let derived = price.map(|p| quantity as f64 * p.abs());

    let sales_out = match (sales, derived) {
        (Some(s), Some(d)) if s > 0.0 && s == d => Some(s),
        (Some(s), None) if s > 0.0 => Some(s),
        (_, Some(d)) => Some(d),
        _ => None,
    };

    let price_out = match price {
        Some(p) if p >= 0.0 => Some(p),
        _ => match sales_out {
            Some(s) if quantity != 0 => Some(s / quantity as f64),
            _ => None,
        },
    };

    (sales_out, price_out)
}
