//! Derived Metrics Module
//! Profit, margin, unit price and calendar parts computed per transaction.

use chrono::Datelike;

use crate::data::{DerivedMetrics, Transaction};

/// Rows where a ratio could not be computed because its denominator was zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DivisionSkips {
    pub zero_revenue: usize,
    pub zero_quantity: usize,
}

/// Fill `tx.derived` from the amount and date fields already on the row.
///
/// profit = revenue - cost; margin = profit / revenue (skipped when revenue
/// is zero); unit price = revenue / quantity (skipped when quantity is zero).
pub fn derive_metrics(tx: &mut Transaction, skips: &mut DivisionSkips) {
    let mut metrics = DerivedMetrics::default();

    if let (Some(revenue), Some(cost)) = (tx.revenue, tx.cost) {
        let profit = revenue - cost;
        metrics.profit = Some(profit);
        if revenue == 0.0 {
            skips.zero_revenue += 1;
        } else {
            metrics.profit_margin = Some(profit / revenue);
        }
    }

    if let (Some(revenue), Some(quantity)) = (tx.revenue, tx.quantity) {
        if quantity == 0 {
            skips.zero_quantity += 1;
        } else {
            metrics.avg_unit_price = Some(revenue / quantity as f64);
        }
    }

    if let Some(date) = tx.date {
        metrics.year = Some(date.year());
        metrics.month = Some(date.month());
        metrics.quarter = Some(quarter_of(date.month()));
    }

    tx.derived = metrics;
}

/// Calendar quarter (1-4) of a month (1-12).
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}
