//! Segment Reports
//! Category and region breakdowns.

use super::table::{desc_then_label, group_totals, ReportTable, Totals};
use crate::config::Field;
use crate::data::Dataset;

/// Revenue, share and profitability per product category.
pub fn category_analysis(dataset: &Dataset) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.category.clone());
    let grand_total: f64 = groups.values().map(|t| t.revenue).sum();
    let ranked = rank_by_revenue(groups.into_iter().collect());

    let with_quantity = dataset.has(Field::Quantity);
    let with_profit = dataset.has_profit();

    ReportTable::new()
        .text("category", ranked.iter().map(|(name, _)| name.clone()).collect())
        .int("transactions", ranked.iter().map(|(_, t)| t.transactions as i64).collect())
        .float("total_revenue", ranked.iter().map(|(_, t)| Some(t.revenue)).collect())
        .float(
            "revenue_share",
            ranked
                .iter()
                .map(|(_, t)| (grand_total != 0.0).then(|| t.revenue / grand_total))
                .collect(),
        )
        .float_if(
            "total_quantity",
            with_quantity.then(|| ranked.iter().map(|(_, t)| Some(t.quantity)).collect()),
        )
        .float_if(
            "total_profit",
            with_profit.then(|| ranked.iter().map(|(_, t)| Some(t.profit)).collect()),
        )
        .float_if(
            "avg_profit_margin",
            with_profit.then(|| ranked.iter().map(|(_, t)| t.avg_margin()).collect()),
        )
}

/// Revenue per region and `YYYY-MM` period.
pub fn regional_monthly_sales(dataset: &Dataset) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| {
        Some((tx.region.clone()?, tx.period()?))
    });

    ReportTable::new()
        .text("region", groups.keys().map(|(region, _)| region.clone()).collect())
        .text("period", groups.keys().map(|(_, period)| period.clone()).collect())
        .int("transactions", groups.values().map(|t| t.transactions as i64).collect())
        .float("total_revenue", groups.values().map(|t| Some(t.revenue)).collect())
}

/// Totals per region, highest revenue first.
pub fn region_summary(dataset: &Dataset) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.region.clone());
    let ranked = rank_by_revenue(groups.into_iter().collect());

    ReportTable::new()
        .text("region", ranked.iter().map(|(name, _)| name.clone()).collect())
        .int("transactions", ranked.iter().map(|(_, t)| t.transactions as i64).collect())
        .float("total_revenue", ranked.iter().map(|(_, t)| Some(t.revenue)).collect())
        .float(
            "avg_transaction_value",
            ranked.iter().map(|(_, t)| t.avg_transaction_value()).collect(),
        )
        .float_if(
            "total_profit",
            dataset
                .has_profit()
                .then(|| ranked.iter().map(|(_, t)| Some(t.profit)).collect()),
        )
}

fn rank_by_revenue(mut groups: Vec<(String, Totals)>) -> Vec<(String, Totals)> {
    groups.sort_by(|(a_name, a), (b_name, b)| {
        desc_then_label((a.revenue, a_name.as_str()), (b.revenue, b_name.as_str()))
    });
    groups
}
