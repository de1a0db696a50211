//! Loyal Customers Report
//! Repeat buyers ranked by purchase count, then spend.

use std::cmp::Ordering;

use super::table::{group_totals, ReportTable};
use crate::data::Dataset;

/// Customers with at least `min_transactions` purchases, top `top_n`.
pub fn loyal_customers(dataset: &Dataset, min_transactions: usize, top_n: usize) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.customer.clone());

    let mut ranked: Vec<_> = groups
        .into_iter()
        .filter(|(_, t)| t.transactions >= min_transactions)
        .collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| {
        b.transactions
            .cmp(&a.transactions)
            .then_with(|| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal))
            .then_with(|| a_name.cmp(b_name))
    });
    ranked.truncate(top_n);

    ReportTable::new()
        .text("customer", ranked.iter().map(|(name, _)| name.clone()).collect())
        .int("transactions", ranked.iter().map(|(_, t)| t.transactions as i64).collect())
        .float("total_revenue", ranked.iter().map(|(_, t)| Some(t.revenue)).collect())
        .float(
            "avg_transaction_value",
            ranked.iter().map(|(_, t)| t.avg_transaction_value()).collect(),
        )
}
