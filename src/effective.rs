// Effective-date derivation - validity intervals for versioned products.
// Currency is inferred from a null end date; there is no is_current flag.

use crate::model::ProductSilver;

/// Chain consecutive product versions: within each product key, sorted
/// ascending by start date, a row's end date becomes the next row's start
/// date. The last (current) version of each key gets a null end date.
///
/// The sort appends product key and product id behind the start date, so
/// the order is total and surrogate-key assignment downstream never
/// depends on incidental input order.
pub fn chain_end_dates(rows: &mut [ProductSilver]) {
    rows.sort_by(|a, b| {
        a.product_key
            .cmp(&b.product_key)
            .then(a.start_date.cmp(&b.start_date))
            .then(a.product_id.cmp(&b.product_id))
    });

    for i in 0..rows.len() {
        let next_start = match rows.get(i + 1) {
            Some(next) if next.product_key == rows[i].product_key => next.start_date,
            _ => None,
        };
        rows[i].end_date = next_start;
    }
}
