//! Configuration Module
//! Explicit run configuration and the canonical column alias table.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT_PATH: &str = "data/sales_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Alias list for '{0}' is empty")]
    EmptyAliases(Field),
}

/// Canonical transaction fields the pipeline knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Revenue,
    Cost,
    Quantity,
    Date,
    Product,
    Customer,
    Category,
    Region,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Revenue,
        Field::Cost,
        Field::Quantity,
        Field::Date,
        Field::Product,
        Field::Customer,
        Field::Category,
        Field::Region,
    ];

    /// Monetary/count fields every analysis is built on.
    pub const AMOUNTS: [Field; 3] = [Field::Revenue, Field::Cost, Field::Quantity];

    pub fn name(self) -> &'static str {
        match self {
            Field::Revenue => "revenue",
            Field::Cost => "cost",
            Field::Quantity => "quantity",
            Field::Date => "date",
            Field::Product => "product",
            Field::Customer => "customer",
            Field::Category => "category",
            Field::Region => "region",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from canonical field to the header names accepted for it.
///
/// Order matters: when several aliases are present in one file, the earliest
/// entry in the list wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ColumnAliases(BTreeMap<Field, Vec<String>>);

impl Default for ColumnAliases {
    fn default() -> Self {
        let table: [(Field, &[&str]); 8] = [
            (
                Field::Revenue,
                &["revenue", "sales", "total_sales", "sales_amount", "amount"],
            ),
            (Field::Cost, &["cost", "cogs", "total_cost", "cost_amount"]),
            (Field::Quantity, &["quantity", "qty", "units", "units_sold"]),
            (Field::Date, &["date", "transaction_date", "order_date"]),
            (Field::Product, &["product", "product_name", "product_id"]),
            (Field::Customer, &["customer", "customer_id", "customer_name"]),
            (Field::Category, &["category", "product_category"]),
            (Field::Region, &["region", "sales_region"]),
        ];

        Self(
            table
                .into_iter()
                .map(|(field, names)| (field, names.iter().map(|n| n.to_string()).collect()))
                .collect(),
        )
    }
}

impl ColumnAliases {
    /// Accepted header names for `field`, in precedence order.
    pub fn for_field(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the accepted names for one field.
    pub fn set(&mut self, field: Field, names: Vec<String>) {
        self.0.insert(field, names);
    }

    /// Overlay entries from `other`; fields it does not mention keep their aliases.
    fn merge(&mut self, other: ColumnAliases) {
        for (field, names) in other.0 {
            self.0.insert(field, names);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, names) in &self.0 {
            if names.iter().all(|n| n.trim().is_empty()) {
                return Err(ConfigError::EmptyAliases(*field));
            }
        }
        Ok(())
    }
}

/// Everything a run needs, passed explicitly into the pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// chrono format string every date cell must match.
    pub date_format: String,
    pub top_n: usize,
    pub loyal_min_transactions: usize,
    pub aliases: ColumnAliases,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            top_n: 10,
            loyal_min_transactions: 2,
            aliases: ColumnAliases::default(),
        }
    }
}

/// On-disk JSON shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    date_format: Option<String>,
    top_n: Option<usize>,
    loyal_min_transactions: Option<usize>,
    aliases: Option<ColumnAliases>,
}

impl AnalyzerConfig {
    /// Defaults overlaid with the values from a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(text)?;
        let mut config = Self::default();

        if let Some(v) = file.input_path {
            config.input_path = v;
        }
        if let Some(v) = file.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = file.date_format {
            config.date_format = v;
        }
        if let Some(v) = file.top_n {
            config.top_n = v;
        }
        if let Some(v) = file.loyal_min_transactions {
            config.loyal_min_transactions = v;
        }
        if let Some(aliases) = file.aliases {
            config.aliases.merge(aliases);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aliases.validate()
    }
}
