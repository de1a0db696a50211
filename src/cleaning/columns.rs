//! Column Resolution Module
//! Maps input headers onto canonical fields via the configured alias table.

use std::collections::BTreeMap;

use crate::config::{ColumnAliases, Field};
use crate::data::{RawTable, DERIVED_COLUMNS};

/// A field for which more than one accepted header was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConflict {
    pub field: Field,
    pub chosen: String,
    pub ignored: Vec<String>,
}

/// Result of matching headers against the alias table.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolution {
    pub columns: BTreeMap<Field, usize>,
    pub conflicts: Vec<AliasConflict>,
}

impl ColumnResolution {
    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }

    pub fn has_any_amount(&self) -> bool {
        Field::AMOUNTS.iter().any(|f| self.columns.contains_key(f))
    }
}

/// Lower-case, trim and strip a UTF-8 BOM from a header name.
pub fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Resolve every canonical field to at most one header index.
///
/// Aliases are tried in list order, so the first alias found wins.
pub fn resolve_columns(headers: &[String], aliases: &ColumnAliases) -> ColumnResolution {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header_name(h)).collect();
    let mut resolution = ColumnResolution::default();

    for field in Field::ALL {
        let mut matches: Vec<usize> = Vec::new();
        for alias in aliases.for_field(field) {
            let alias = normalize_header_name(alias);
            for (idx, header) in normalized.iter().enumerate() {
                if *header == alias && !matches.contains(&idx) {
                    matches.push(idx);
                }
            }
        }

        let Some((&chosen, rest)) = matches.split_first() else {
            continue;
        };
        if !rest.is_empty() {
            resolution.conflicts.push(AliasConflict {
                field,
                chosen: headers[chosen].clone(),
                ignored: rest.iter().map(|&i| headers[i].clone()).collect(),
            });
        }
        resolution.columns.insert(field, chosen);
    }

    resolution
}

/// Drop input columns that carry a derived column's name.
///
/// Returns the names that were removed.
pub fn strip_derived_columns(table: &mut RawTable) -> Vec<String> {
    let drop: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| DERIVED_COLUMNS.contains(&normalize_header_name(h).as_str()))
        .map(|(i, _)| i)
        .collect();

    if drop.is_empty() {
        return Vec::new();
    }

    let keep = |i: &usize| !drop.contains(i);
    let removed = drop.iter().map(|&i| table.headers[i].clone()).collect();

    table.headers = retain_indices(std::mem::take(&mut table.headers), keep);
    for row in &mut table.rows {
        *row = retain_indices(std::mem::take(row), keep);
    }

    removed
}

fn retain_indices<T>(values: Vec<T>, keep: impl Fn(&usize) -> bool) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep(i))
        .map(|(_, v)| v)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn synonyms_resolve_case_insensitively() {
        let h = headers(&["\u{feff}Order_Date", "SALES", " Qty ", "COGS", "Product"]);
        let r = resolve_columns(&h, &ColumnAliases::default());

        assert_eq!(r.get(Field::Date), Some(0));
        assert_eq!(r.get(Field::Revenue), Some(1));
        assert_eq!(r.get(Field::Quantity), Some(2));
        assert_eq!(r.get(Field::Cost), Some(3));
        assert_eq!(r.get(Field::Product), Some(4));
        assert_eq!(r.missing(), vec![Field::Customer, Field::Category, Field::Region]);
        assert!(r.conflicts.is_empty());
    }

    #[test]
    fn earlier_alias_wins_when_both_present() {
        let h = headers(&["Sales", "Revenue", "Cost"]);
        let r = resolve_columns(&h, &ColumnAliases::default());

        assert_eq!(r.get(Field::Revenue), Some(1));
        assert_eq!(
            r.conflicts,
            vec![AliasConflict {
                field: Field::Revenue,
                chosen: "Revenue".to_string(),
                ignored: vec!["Sales".to_string()],
            }]
        );
    }

    #[test]
    fn no_amount_columns() {
        let h = headers(&["date", "product"]);
        let r = resolve_columns(&h, &ColumnAliases::default());
        assert!(!r.has_any_amount());
    }

    #[test]
    fn derived_named_columns_are_stripped() {
        let mut table = RawTable::from_rows(
            &["revenue", "Profit", "cost", "quarter"],
            &[&["10", "99", "4", "Q1"]],
        );
        let removed = strip_derived_columns(&mut table);

        assert_eq!(removed, ["Profit", "quarter"]);
        assert_eq!(table.headers, ["revenue", "cost"]);
        assert_eq!(
            table.rows[0],
            vec![Some("10".to_string()), Some("4".to_string())]
        );
    }
}
