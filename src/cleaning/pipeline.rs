//! Cleaning Pipeline Module
//! Validates and repairs raw rows, then computes derived columns.
//!
//! Steps run in a fixed order and each one appends to the analysis log:
//! column resolution, missing values, duplicates, negative values, date
//! parsing, derived columns. Row defects never fail the run; only an input
//! with no usable amount columns or with zero rows left does.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use super::columns::{resolve_columns, strip_derived_columns, ColumnResolution};
use super::derive::{derive_metrics, DivisionSkips};
use crate::config::{AnalyzerConfig, ColumnAliases, Field};
use crate::data::analysis_log::{plural, rows, step};
use crate::data::{AnalysisLog, Dataset, DerivedMetrics, RawTable, Transaction};

/// Conditions under which no reports can be produced.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanError {
    #[error("no usable amount columns: none of revenue, cost or quantity could be resolved")]
    NoAmountColumns,
    #[error("no data: 0 rows remain after cleaning")]
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellDefect {
    Missing,
    NonNumeric,
}

/// Runs the cleaning/derivation steps over a raw table.
pub struct Cleaner<'a> {
    aliases: &'a ColumnAliases,
    date_format: &'a str,
}

impl<'a> Cleaner<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            aliases: &config.aliases,
            date_format: &config.date_format,
        }
    }

    /// Clean `table`, recording every decision in `log`.
    pub fn clean(&self, mut table: RawTable, log: &mut AnalysisLog) -> Result<Dataset, CleanError> {
        let original_rows = table.height();

        if table.width() == 0 && original_rows == 0 {
            warn!("input has no header and no rows");
            log.record(step::LOAD, "input is empty: no header row and no data rows");
            log.record(step::FATAL, CleanError::NoData.to_string());
            return Err(CleanError::NoData);
        }

        let resolution = self.resolve(&mut table, log)?;
        let records = self.drop_missing(&table, &resolution, log);
        let records = drop_duplicates(records, log);
        let records = drop_negative(records, &resolution, log);
        let mut records = self.parse_dates(records, &table, &resolution, log);

        if records.is_empty() {
            warn!("no rows remain after cleaning");
            log.record(step::FATAL, CleanError::NoData.to_string());
            return Err(CleanError::NoData);
        }

        let dataset_columns = resolution.columns.clone();
        derive_columns(&mut records, &dataset_columns, log);

        Ok(Dataset {
            headers: table.headers,
            columns: dataset_columns,
            records,
            original_rows,
        })
    }

    fn resolve(&self, table: &mut RawTable, log: &mut AnalysisLog) -> Result<ColumnResolution, CleanError> {
        let replaced = strip_derived_columns(table);
        let resolution = resolve_columns(&table.headers, self.aliases);

        let mut parts: Vec<String> = Vec::new();
        let resolved: Vec<String> = resolution
            .columns
            .iter()
            .map(|(field, idx)| format!("{field} <- '{}'", table.headers[*idx]))
            .collect();
        parts.push(if resolved.is_empty() {
            "no fields resolved".to_string()
        } else {
            format!("resolved {}", resolved.join(", "))
        });

        let missing = resolution.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            parts.push(format!("unresolved: {}", names.join(", ")));
        }
        for conflict in &resolution.conflicts {
            parts.push(format!(
                "'{}' preferred over '{}' for {}",
                conflict.chosen,
                conflict.ignored.join("', '"),
                conflict.field
            ));
        }
        if !replaced.is_empty() {
            parts.push(format!(
                "replaced existing derived columns: {}",
                replaced.join(", ")
            ));
        }
        log.record(step::COLUMN_RESOLUTION, parts.join("; "));

        for field in Field::AMOUNTS {
            if resolution.get(field).is_none() {
                log.record(
                    step::COLUMN_RESOLUTION,
                    format!(
                        "no {field} column found (accepted: {}); analyses that need {field} will be skipped",
                        self.aliases.for_field(field).join(", ")
                    ),
                );
            }
        }

        if !resolution.has_any_amount() {
            warn!("no amount columns resolved");
            log.record(step::FATAL, CleanError::NoAmountColumns.to_string());
            return Err(CleanError::NoAmountColumns);
        }

        Ok(resolution)
    }

    fn drop_missing(&self, table: &RawTable, resolution: &ColumnResolution, log: &mut AnalysisLog) -> Vec<Transaction> {
        let revenue_idx = resolution.get(Field::Revenue);
        let cost_idx = resolution.get(Field::Cost);
        let quantity_idx = resolution.get(Field::Quantity);

        let mut records = Vec::with_capacity(table.height());
        let mut dropped = 0usize;
        let mut coerced = 0usize;

        for row in &table.rows {
            let cell = move |idx: usize| row.get(idx).and_then(|c| c.as_deref());

            let revenue = revenue_idx.map(|i| parse_amount(cell(i))).transpose();
            let cost = cost_idx.map(|i| parse_amount(cell(i))).transpose();
            let quantity = quantity_idx.map(|i| parse_quantity(cell(i))).transpose();

            coerced += [revenue.err(), cost.err(), quantity.err()]
                .iter()
                .filter(|d| **d == Some(CellDefect::NonNumeric))
                .count();

            let (Ok(revenue), Ok(cost), Ok(quantity)) = (revenue, cost, quantity) else {
                dropped += 1;
                continue;
            };

            let label = |field: Field| {
                resolution
                    .get(field)
                    .and_then(|i| cell(i))
                    .map(str::to_string)
            };

            records.push(Transaction {
                cells: row.clone(),
                revenue,
                cost,
                quantity,
                date: None,
                product: label(Field::Product),
                customer: label(Field::Customer),
                category: label(Field::Category),
                region: label(Field::Region),
                derived: DerivedMetrics::default(),
            });
        }

        let fields: Vec<&str> = Field::AMOUNTS
            .iter()
            .filter(|f| resolution.get(**f).is_some())
            .map(|f| f.name())
            .collect();
        let mut message = format!(
            "dropped {} with missing {}",
            rows(dropped),
            fields.join("/")
        );
        if coerced > 0 {
            message.push_str(&format!(
                " ({} coerced to missing)",
                plural(coerced, "non-numeric value", "non-numeric values")
            ));
        }
        debug!(dropped, coerced, "missing values handled");
        log.record(step::MISSING_VALUES, message);

        records
    }

    fn parse_dates(
        &self,
        mut records: Vec<Transaction>,
        table: &RawTable,
        resolution: &ColumnResolution,
        log: &mut AnalysisLog,
    ) -> Vec<Transaction> {
        let Some(date_idx) = resolution.get(Field::Date) else {
            log.record(
                step::DATE_PARSING,
                "no date column found; year/month/quarter columns and date-dependent reports skipped",
            );
            return records;
        };

        let header = &table.headers[date_idx];
        let before = records.len();
        records.retain_mut(|tx| {
            let parsed = tx
                .cells
                .get(date_idx)
                .and_then(|c| c.as_deref())
                .and_then(|s| parse_date(s, self.date_format));
            tx.date = parsed;
            parsed.is_some()
        });
        let dropped = before - records.len();

        let mut message = format!(
            "parsed {} from '{header}' (format {})",
            plural(records.len(), "date", "dates"),
            self.date_format
        );
        if dropped > 0 {
            message.push_str(&format!(
                "; dropped {} with missing or unparseable dates",
                rows(dropped)
            ));
        }
        debug!(dropped, "dates parsed");
        log.record(step::DATE_PARSING, message);

        records
    }
}

fn drop_duplicates(records: Vec<Transaction>, log: &mut AnalysisLog) -> Vec<Transaction> {
    let before = records.len();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);
    let records: Vec<Transaction> = records
        .into_iter()
        .filter(|tx| seen.insert(tx.cells.clone()))
        .collect();

    let dropped = before - records.len();
    log.record(
        step::DUPLICATES,
        format!("dropped {}", plural(dropped, "duplicate row", "duplicate rows")),
    );
    records
}

fn drop_negative(records: Vec<Transaction>, resolution: &ColumnResolution, log: &mut AnalysisLog) -> Vec<Transaction> {
    let mut dropped: BTreeMap<Field, usize> = BTreeMap::new();

    let records: Vec<Transaction> = records
        .into_iter()
        .filter(|tx| match negative_field(tx) {
            Some(field) => {
                *dropped.entry(field).or_default() += 1;
                false
            }
            None => true,
        })
        .collect();

    if dropped.is_empty() {
        let fields: Vec<&str> = Field::AMOUNTS
            .iter()
            .filter(|f| resolution.get(**f).is_some())
            .map(|f| f.name())
            .collect();
        log.record(
            step::INVALID_VALUES,
            format!("no rows with negative {}", fields.join("/")),
        );
    }
    for (field, count) in dropped {
        log.record(
            step::INVALID_VALUES,
            format!("dropped {} with negative {field}", rows(count)),
        );
    }

    records
}

/// First amount field (revenue, cost, quantity) holding a negative value.
fn negative_field(tx: &Transaction) -> Option<Field> {
    if tx.revenue.is_some_and(|v| v < 0.0) {
        Some(Field::Revenue)
    } else if tx.cost.is_some_and(|v| v < 0.0) {
        Some(Field::Cost)
    } else if tx.quantity.is_some_and(|v| v < 0) {
        Some(Field::Quantity)
    } else {
        None
    }
}

fn derive_columns(records: &mut [Transaction], columns: &BTreeMap<Field, usize>, log: &mut AnalysisLog) {
    let has = |f: Field| columns.contains_key(&f);
    let has_profit = has(Field::Revenue) && has(Field::Cost);
    let has_unit_price = has(Field::Revenue) && has(Field::Quantity);

    let mut skips = DivisionSkips::default();
    for tx in records.iter_mut() {
        derive_metrics(tx, &mut skips);
    }

    let mut computed: Vec<&str> = Vec::new();
    if has_profit {
        computed.extend(["profit", "profit_margin"]);
    }
    if has_unit_price {
        computed.push("avg_unit_price");
    }
    if has(Field::Date) {
        computed.extend(["year", "month", "quarter"]);
    }

    let mut parts = vec![if computed.is_empty() {
        "no derived columns could be computed".to_string()
    } else {
        format!("computed {} for {}", computed.join(", "), rows(records.len()))
    }];
    if has_profit {
        parts.push(format!(
            "profit_margin skipped for {} with zero revenue",
            rows(skips.zero_revenue)
        ));
    } else {
        parts.push("profit and profit_margin not computed (needs revenue and cost)".to_string());
    }
    if has_unit_price {
        parts.push(format!(
            "avg_unit_price skipped for {} with zero quantity",
            rows(skips.zero_quantity)
        ));
    } else {
        parts.push("avg_unit_price not computed (needs revenue and quantity)".to_string());
    }

    log.record(step::DERIVED_COLUMNS, parts.join("; "));
}

fn parse_amount(cell: Option<&str>) -> Result<f64, CellDefect> {
    let s = cell.ok_or(CellDefect::Missing)?;
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CellDefect::NonNumeric),
    }
}

fn parse_quantity(cell: Option<&str>) -> Result<i64, CellDefect> {
    let s = cell.ok_or(CellDefect::Missing)?;
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    // Spreadsheet exports often write integral counts as `3.0`.
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(CellDefect::NonNumeric),
    }
}

fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, format).ok()
}
