//! Dataset Module
//! Typed transaction rows produced by the cleaning pipeline.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::table::RawTable;
use crate::config::Field;

/// Names of the columns computed by the pipeline, in output order.
pub const DERIVED_COLUMNS: [&str; 6] = [
    "profit",
    "profit_margin",
    "avg_unit_price",
    "year",
    "month",
    "quarter",
];

/// Values computed from other columns. `None` means not computed for this row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    pub profit: Option<f64>,
    pub profit_margin: Option<f64>,
    pub avg_unit_price: Option<f64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub quarter: Option<u32>,
}

/// One sales record.
///
/// Amount fields are `None` only when their column could not be resolved for
/// the whole dataset; after cleaning a resolved amount is always present and
/// non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Original cell text, aligned with `Dataset::headers`.
    pub cells: Vec<Option<String>>,
    pub revenue: Option<f64>,
    pub cost: Option<f64>,
    pub quantity: Option<i64>,
    pub date: Option<NaiveDate>,
    pub product: Option<String>,
    pub customer: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub derived: DerivedMetrics,
}

impl Transaction {
    /// Text label for one of the categorical fields.
    pub fn label(&self, field: Field) -> Option<&str> {
        match field {
            Field::Product => self.product.as_deref(),
            Field::Customer => self.customer.as_deref(),
            Field::Category => self.category.as_deref(),
            Field::Region => self.region.as_deref(),
            _ => None,
        }
    }

    /// `YYYY-MM` of the transaction date.
    pub fn period(&self) -> Option<String> {
        match (self.derived.year, self.derived.month) {
            (Some(y), Some(m)) => Some(format!("{y:04}-{m:02}")),
            _ => None,
        }
    }
}

/// Cleaned, enriched transactions. Read-only once the pipeline returns it.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub(crate) headers: Vec<String>,
    pub(crate) columns: BTreeMap<Field, usize>,
    pub(crate) records: Vec<Transaction>,
    pub(crate) original_rows: usize,
}

impl Dataset {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row count of the input before cleaning.
    pub fn original_rows(&self) -> usize {
        self.original_rows
    }

    /// Whether `field` was resolved to an input column.
    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Input header a field was resolved from.
    pub fn source_header(&self, field: Field) -> Option<&str> {
        self.columns
            .get(&field)
            .and_then(|idx| self.headers.get(*idx))
            .map(String::as_str)
    }

    pub fn has_profit(&self) -> bool {
        self.has(Field::Revenue) && self.has(Field::Cost)
    }

    pub fn has_unit_price(&self) -> bool {
        self.has(Field::Revenue) && self.has(Field::Quantity)
    }

    /// Derived columns that exist for this dataset, in output order.
    pub fn derived_columns(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.has_profit() {
            out.extend(["profit", "profit_margin"]);
        }
        if self.has_unit_price() {
            out.push("avg_unit_price");
        }
        if self.has(Field::Date) {
            out.extend(["year", "month", "quarter"]);
        }
        out
    }

    /// Enriched table: original columns followed by the derived ones.
    pub fn to_table(&self) -> RawTable {
        let derived = self.derived_columns();
        let mut headers = self.headers.clone();
        headers.extend(derived.iter().map(|d| d.to_string()));

        let mut table = RawTable::new(headers);
        for record in &self.records {
            let mut cells = record.cells.clone();
            cells.extend(derived.iter().map(|name| derived_cell(&record.derived, name)));
            table.push_row(cells);
        }
        table
    }
}

fn derived_cell(metrics: &DerivedMetrics, name: &str) -> Option<String> {
    match name {
        "profit" => metrics.profit.map(|v| v.to_string()),
        "profit_margin" => metrics.profit_margin.map(|v| v.to_string()),
        "avg_unit_price" => metrics.avg_unit_price.map(|v| v.to_string()),
        "year" => metrics.year.map(|v| v.to_string()),
        "month" => metrics.month.map(|v| v.to_string()),
        "quarter" => metrics.quarter.map(|v| v.to_string()),
        _ => None,
    }
}
