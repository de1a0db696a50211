//! Final Report Module
//! Headline metrics for the whole cleaned dataset and their console rendering.

use std::fmt;

use statrs::statistics::Statistics;

use super::table::ReportTable;
use crate::data::Dataset;

/// A final-report value: row counts stay integral, amounts get two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(usize),
    Amount(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Amount(x) => write!(f, "{x:.2}"),
        }
    }
}

/// Headline metrics of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalSummary {
    pub original_rows: usize,
    pub rows_removed: usize,
    pub total_transactions: usize,
    pub total_revenue: f64,
    pub average_transaction_value: f64,
    pub max_transaction_value: f64,
    pub min_transaction_value: f64,
    pub total_profit: Option<f64>,
    pub average_profit_per_transaction: Option<f64>,
    pub average_profit_margin: Option<f64>,
}

impl FinalSummary {
    /// Compute the summary; `None` if the dataset has no revenue column or no rows.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        let revenues: Vec<f64> = dataset.records().iter().filter_map(|r| r.revenue).collect();
        if revenues.is_empty() {
            return None;
        }

        let profits: Vec<f64> = dataset
            .records()
            .iter()
            .filter_map(|r| r.derived.profit)
            .collect();
        let margins: Vec<f64> = dataset
            .records()
            .iter()
            .filter_map(|r| r.derived.profit_margin)
            .collect();
        let with_profit = dataset.has_profit() && !profits.is_empty();

        Some(Self {
            original_rows: dataset.original_rows(),
            rows_removed: dataset.original_rows().saturating_sub(dataset.len()),
            total_transactions: dataset.len(),
            total_revenue: revenues.iter().sum(),
            average_transaction_value: Statistics::mean(revenues.iter()),
            max_transaction_value: Statistics::max(revenues.iter()),
            min_transaction_value: Statistics::min(revenues.iter()),
            total_profit: with_profit.then(|| profits.iter().sum()),
            average_profit_per_transaction: with_profit.then(|| Statistics::mean(profits.iter())),
            average_profit_margin: (!margins.is_empty()).then(|| Statistics::mean(margins.iter())),
        })
    }

    /// `(metric, value)` pairs in report order.
    pub fn metrics(&self) -> Vec<(&'static str, MetricValue)> {
        use MetricValue::{Amount, Count};

        let mut out = vec![
            ("original_rows", Count(self.original_rows)),
            ("rows_removed", Count(self.rows_removed)),
            ("total_transactions", Count(self.total_transactions)),
            ("total_revenue", Amount(self.total_revenue)),
            ("average_transaction_value", Amount(self.average_transaction_value)),
            ("max_transaction_value", Amount(self.max_transaction_value)),
            ("min_transaction_value", Amount(self.min_transaction_value)),
        ];
        let optional = [
            ("total_profit", self.total_profit),
            ("average_profit_per_transaction", self.average_profit_per_transaction),
            ("average_profit_margin", self.average_profit_margin),
        ];
        out.extend(optional.into_iter().filter_map(|(name, v)| Some((name, Amount(v?)))));
        out
    }

    pub fn to_table(&self) -> ReportTable {
        let metrics = self.metrics();
        ReportTable::new()
            .text("metric", metrics.iter().map(|(m, _)| m.to_string()).collect())
            .text("value", metrics.iter().map(|(_, v)| v.to_string()).collect())
    }
}

/// Fixed-format key/value table printed after a successful run.
pub fn format_summary_table(summary: &FinalSummary) -> String {
    let mut rows: Vec<(&str, String)> = vec![
        ("Total Transactions", summary.total_transactions.to_string()),
        ("Total Revenue", format!("{:.2}", summary.total_revenue)),
        (
            "Average Transaction Value",
            format!("{:.2}", summary.average_transaction_value),
        ),
        ("Max Transaction Value", format!("{:.2}", summary.max_transaction_value)),
        ("Min Transaction Value", format!("{:.2}", summary.min_transaction_value)),
    ];
    rows.push(("Total Profit", fmt_opt(summary.total_profit, 2)));
    rows.push((
        "Average Profit per Transaction",
        fmt_opt(summary.average_profit_per_transaction, 2),
    ));
    rows.push((
        "Average Profit Margin",
        summary
            .average_profit_margin
            .map(|m| format!("{:.2}%", m * 100.0))
            .unwrap_or_else(|| "n/a".to_string()),
    ));

    let mut out = String::new();
    out.push_str(&format!("{:<32} {:>16}\n", "Metric", "Value"));
    out.push_str(&format!("{:-<32} {:-<16}\n", "", ""));
    for (name, value) in rows {
        out.push_str(&format!("{name:<32} {value:>16}\n"));
    }
    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    v.map(|x| format!("{x:.decimals$}"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::dataset;

    #[test]
    fn headline_metrics() {
        let ds = dataset(
            &["revenue", "cost", "quantity"],
            &[&["100", "60", "1"], &["0", "10", "1"], &["50", "25", "2"], &["-5", "1", "1"]],
        );
        let s = FinalSummary::from_dataset(&ds).unwrap();

        assert_eq!(s.original_rows, 4);
        assert_eq!(s.rows_removed, 1);
        assert_eq!(s.total_transactions, 3);
        assert_eq!(s.total_revenue, 150.0);
        assert_eq!(s.average_transaction_value, 50.0);
        assert_eq!(s.max_transaction_value, 100.0);
        assert_eq!(s.min_transaction_value, 0.0);
        assert_eq!(s.total_profit, Some(55.0));
        assert!((s.average_profit_per_transaction.unwrap() - 55.0 / 3.0).abs() < 1e-9);
        // Margins only for non-zero revenue rows: 0.4 and 0.5.
        assert!((s.average_profit_margin.unwrap() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn profit_metrics_absent_without_cost() {
        let ds = dataset(&["revenue", "quantity"], &[&["10", "1"], &["30", "1"]]);
        let s = FinalSummary::from_dataset(&ds).unwrap();

        assert_eq!(s.total_profit, None);
        let names: Vec<_> = s.metrics().into_iter().map(|(n, _)| n).collect();
        assert!(!names.contains(&"total_profit"));
        assert_eq!(s.to_table().height(), 7);
    }

    #[test]
    fn counts_render_as_integers() {
        let ds = dataset(&["revenue", "quantity"], &[&["10.5", "1"], &["30", "1"]]);
        let table = FinalSummary::from_dataset(&ds).unwrap().to_table();
        let values = table.texts("value").unwrap();

        assert_eq!(values[0], "2");
        assert_eq!(values[2], "2");
        assert_eq!(values[3], "40.50");
    }

    #[test]
    fn no_revenue_column_means_no_summary() {
        let ds = dataset(&["cost", "quantity"], &[&["10", "1"]]);
        assert!(FinalSummary::from_dataset(&ds).is_none());
    }

    #[test]
    fn console_table_layout() {
        let ds = dataset(
            &["revenue", "cost", "quantity"],
            &[&["100", "60", "1"], &["50", "25", "2"]],
        );
        let text = format_summary_table(&FinalSummary::from_dataset(&ds).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("Metric"));
        assert!(lines[2].starts_with("Total Transactions"));
        assert!(lines[2].ends_with(" 2"));
        assert!(lines[3].ends_with("150.00"));
        assert!(lines[9].ends_with("45.00%"));
    }
}
