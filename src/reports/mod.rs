//! Reports module - group-by/aggregate reports over the cleaned dataset
//!
//! Each report declares the fields it needs. A report whose fields were not
//! resolved is skipped and the omission is written to the analysis log.

mod customers;
mod products;
mod segments;
mod summary;
mod table;
mod trends;

pub use customers::loyal_customers;
pub use products::top_products;
pub use segments::{category_analysis, region_summary, regional_monthly_sales};
pub use summary::{format_summary_table, FinalSummary, MetricValue};
pub use table::{ColumnValues, ReportColumn, ReportTable, Totals};
pub use trends::{month_summary, profitability_trend};

use crate::config::{AnalyzerConfig, Field};
use crate::data::analysis_log::{plural, step};
use crate::data::{AnalysisLog, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TopProducts,
    LoyalCustomers,
    ProfitabilityTrend,
    CategoryAnalysis,
    RegionalMonthlySales,
    RegionSummary,
    MonthSummary,
    FinalReport,
}

impl ReportKind {
    pub const ALL: [ReportKind; 8] = [
        ReportKind::TopProducts,
        ReportKind::LoyalCustomers,
        ReportKind::ProfitabilityTrend,
        ReportKind::CategoryAnalysis,
        ReportKind::RegionalMonthlySales,
        ReportKind::RegionSummary,
        ReportKind::MonthSummary,
        ReportKind::FinalReport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::TopProducts => "top_products",
            ReportKind::LoyalCustomers => "loyal_customers",
            ReportKind::ProfitabilityTrend => "profitability_trend",
            ReportKind::CategoryAnalysis => "category_analysis",
            ReportKind::RegionalMonthlySales => "regional_monthly_sales",
            ReportKind::RegionSummary => "region_summary",
            ReportKind::MonthSummary => "month_summary",
            ReportKind::FinalReport => "final_report",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    /// Fields that must be resolved for this report to be produced.
    pub fn requires(self) -> &'static [Field] {
        match self {
            ReportKind::TopProducts => &[Field::Product, Field::Revenue],
            ReportKind::LoyalCustomers => &[Field::Customer, Field::Revenue],
            ReportKind::ProfitabilityTrend => &[Field::Date, Field::Revenue, Field::Cost],
            ReportKind::CategoryAnalysis => &[Field::Category, Field::Revenue],
            ReportKind::RegionalMonthlySales => &[Field::Region, Field::Date, Field::Revenue],
            ReportKind::RegionSummary => &[Field::Region, Field::Revenue],
            ReportKind::MonthSummary => &[Field::Date, Field::Revenue],
            ReportKind::FinalReport => &[Field::Revenue],
        }
    }
}

/// A generated report ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kind: ReportKind,
    pub table: ReportTable,
}

/// All reports of a run plus the headline summary, if one could be computed.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    pub reports: Vec<Report>,
    pub summary: Option<FinalSummary>,
}

impl ReportSet {
    pub fn get(&self, kind: ReportKind) -> Option<&ReportTable> {
        self.reports.iter().find(|r| r.kind == kind).map(|r| &r.table)
    }
}

/// Build every report the dataset supports, logging the ones skipped.
pub fn generate_reports(dataset: &Dataset, config: &AnalyzerConfig, log: &mut AnalysisLog) -> ReportSet {
    let mut set = ReportSet::default();

    for kind in ReportKind::ALL {
        let missing: Vec<&str> = kind
            .requires()
            .iter()
            .filter(|f| !dataset.has(**f))
            .map(|f| f.name())
            .collect();
        if !missing.is_empty() {
            log.record(
                step::REPORTS,
                format!(
                    "skipped {}: no {} column",
                    kind.name(),
                    missing.join(" or ")
                ),
            );
            continue;
        }

        let table = match kind {
            ReportKind::TopProducts => top_products(dataset, config.top_n),
            ReportKind::LoyalCustomers => {
                loyal_customers(dataset, config.loyal_min_transactions, config.top_n)
            }
            ReportKind::ProfitabilityTrend => profitability_trend(dataset),
            ReportKind::CategoryAnalysis => category_analysis(dataset),
            ReportKind::RegionalMonthlySales => regional_monthly_sales(dataset),
            ReportKind::RegionSummary => region_summary(dataset),
            ReportKind::MonthSummary => month_summary(dataset),
            ReportKind::FinalReport => {
                let Some(summary) = FinalSummary::from_dataset(dataset) else {
                    log.record(step::REPORTS, "skipped final_report: no revenue values");
                    continue;
                };
                let table = summary.to_table();
                set.summary = Some(summary);
                table
            }
        };

        log.record(
            step::REPORTS,
            format!("built {} ({})", kind.name(), plural(table.height(), "row", "rows")),
        );
        set.reports.push(Report { kind, table });
    }

    set
}
