//! Top Products Report
//! Best-selling products ranked by total revenue.

use super::table::{desc_then_label, group_totals, ReportTable};
use crate::config::Field;
use crate::data::Dataset;

/// Top `top_n` products by revenue.
pub fn top_products(dataset: &Dataset, top_n: usize) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.product.clone());

    let mut ranked: Vec<_> = groups.into_iter().collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| {
        desc_then_label((a.revenue, a_name.as_str()), (b.revenue, b_name.as_str()))
    });
    ranked.truncate(top_n);

    let with_quantity = dataset.has(Field::Quantity);
    let with_profit = dataset.has_profit();

    ReportTable::new()
        .text("product", ranked.iter().map(|(name, _)| name.clone()).collect())
        .int("transactions", ranked.iter().map(|(_, t)| t.transactions as i64).collect())
        .float("total_revenue", ranked.iter().map(|(_, t)| Some(t.revenue)).collect())
        .float_if(
            "total_quantity",
            with_quantity.then(|| ranked.iter().map(|(_, t)| Some(t.quantity)).collect()),
        )
        .float_if(
            "total_profit",
            with_profit.then(|| ranked.iter().map(|(_, t)| Some(t.profit)).collect()),
        )
}
