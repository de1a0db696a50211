//! Report Table Module
//! Column-oriented table shared by every report generator.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::Transaction;

/// Typed values of one report column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<String>),
    Int(Vec<i64>),
    /// `None` is written as an empty cell.
    Float(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportColumn {
    pub name: String,
    pub values: ColumnValues,
}

/// A header-plus-rows report, stored column by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<ReportColumn>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, values: Vec<String>) -> Self {
        self.push(name, ColumnValues::Text(values));
        self
    }

    pub fn int(mut self, name: &str, values: Vec<i64>) -> Self {
        self.push(name, ColumnValues::Int(values));
        self
    }

    pub fn float(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.push(name, ColumnValues::Float(values));
        self
    }

    /// Add a float column only when `values` is `Some`.
    pub fn float_if(self, name: &str, values: Option<Vec<Option<f64>>>) -> Self {
        match values {
            Some(v) => self.float(name, v),
            None => self,
        }
    }

    fn push(&mut self, name: &str, values: ColumnValues) {
        self.columns.push(ReportColumn {
            name: name.to_string(),
            values,
        });
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    pub fn texts(&self, name: &str) -> Option<&[String]> {
        match self.column(name)? {
            ColumnValues::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn ints(&self, name: &str) -> Option<&[i64]> {
        match self.column(name)? {
            ColumnValues::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn floats(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name)? {
            ColumnValues::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// Running totals over a group of transactions.
#[derive(Debug, Clone, Default)]
pub struct Totals {
    pub transactions: usize,
    pub revenue: f64,
    pub cost: f64,
    pub quantity: f64,
    pub profit: f64,
    pub margins: Vec<f64>,
}

impl Totals {
    pub fn add(&mut self, tx: &Transaction) {
        self.transactions += 1;
        self.revenue += tx.revenue.unwrap_or(0.0);
        self.cost += tx.cost.unwrap_or(0.0);
        self.quantity += tx.quantity.map_or(0.0, |q| q as f64);
        self.profit += tx.derived.profit.unwrap_or(0.0);
        if let Some(m) = tx.derived.profit_margin {
            self.margins.push(m);
        }
    }

    pub fn avg_transaction_value(&self) -> Option<f64> {
        (self.transactions > 0).then(|| self.revenue / self.transactions as f64)
    }

    /// profit / revenue over the whole group; `None` when revenue is zero.
    pub fn margin(&self) -> Option<f64> {
        (self.revenue != 0.0).then(|| self.profit / self.revenue)
    }

    pub fn avg_margin(&self) -> Option<f64> {
        (!self.margins.is_empty()).then(|| self.margins.iter().sum::<f64>() / self.margins.len() as f64)
    }
}

/// Group transactions by key, accumulating totals. Keys come back sorted.
pub fn group_totals<'a, K, F>(records: impl IntoIterator<Item = &'a Transaction>, key: F) -> BTreeMap<K, Totals>
where
    K: Ord,
    F: Fn(&Transaction) -> Option<K>,
{
    let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
    for tx in records {
        if let Some(k) = key(tx) {
            groups.entry(k).or_default().add(tx);
        }
    }
    groups
}

/// Descending by `value`, ties broken by `label` ascending.
pub fn desc_then_label(a: (f64, &str), b: (f64, &str)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.cmp(b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_column_order() {
        let table = ReportTable::new()
            .text("name", vec!["a".into(), "b".into()])
            .int("n", vec![1, 2])
            .float_if("skipped", None)
            .float("x", vec![Some(1.5), None]);

        assert_eq!(table.column_names(), ["name", "n", "x"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.ints("n"), Some(&[1, 2][..]));
        assert_eq!(table.floats("x").unwrap()[1], None);
        assert!(table.texts("n").is_none());
    }

    #[test]
    fn ordering_breaks_ties_on_label() {
        let mut rows = vec![(5.0, "b"), (7.0, "z"), (5.0, "a")];
        rows.sort_by(|x, y| desc_then_label(*x, *y));
        assert_eq!(rows, [(7.0, "z"), (5.0, "a"), (5.0, "b")]);
    }
}
