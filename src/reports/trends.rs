//! Time Trend Reports
//! Month-by-month profitability and calendar-month sales summaries.

use chrono::Month;

use super::table::{group_totals, ReportTable};
use crate::data::Dataset;

/// Revenue, cost and profit per `YYYY-MM` period, oldest first.
pub fn profitability_trend(dataset: &Dataset) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.period());

    ReportTable::new()
        .text("period", groups.keys().cloned().collect())
        .int("transactions", groups.values().map(|t| t.transactions as i64).collect())
        .float("revenue", groups.values().map(|t| Some(t.revenue)).collect())
        .float("cost", groups.values().map(|t| Some(t.cost)).collect())
        .float("profit", groups.values().map(|t| Some(t.profit)).collect())
        .float("profit_margin", groups.values().map(|t| t.margin()).collect())
}

/// Sales per calendar month (1-12), pooled across years.
pub fn month_summary(dataset: &Dataset) -> ReportTable {
    let groups = group_totals(dataset.records(), |tx| tx.derived.month);

    ReportTable::new()
        .int("month", groups.keys().map(|m| i64::from(*m)).collect())
        .text("month_name", groups.keys().map(|m| month_name(*m)).collect())
        .int("transactions", groups.values().map(|t| t.transactions as i64).collect())
        .float("total_revenue", groups.values().map(|t| Some(t.revenue)).collect())
        .float(
            "avg_transaction_value",
            groups.values().map(|t| t.avg_transaction_value()).collect(),
        )
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}
