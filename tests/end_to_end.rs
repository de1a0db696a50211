use std::fs;
use std::path::{Path, PathBuf};

use sales_analyzer::app::execute;
use sales_analyzer::cleaning::CleanError;
use sales_analyzer::config::AnalyzerConfig;
use sales_analyzer::data::analysis_log::step;
use sales_analyzer::error::AppError;
use sales_analyzer::reports::ReportKind;
use tempfile::TempDir;

const SALES: &str = "\
Date,Product,Customer,Category,Region,Sales,Cost,Quantity
2024-01-05,Widget,alice,Tools,North,120.00,80.00,3
2024-01-17,Gadget,bob,Toys,South,60.50,20.25,1
2024-02-02,Widget,alice,Tools,North,40.00,25.00,1
2024-02-02,Widget,alice,Tools,North,40.00,25.00,1
2024-02-11,Sprocket,carol,Tools,East,0,5.00,2
2024-03-09,Gadget,bob,Toys,South,75.00,30.00,-2
2024-03-15,Gizmo,dave,Toys,West,,10.00,1
2024-13-40,Gizmo,dave,Toys,West,15.00,10.00,1
2024-03-28,Gizmo,bob,Toys,South,90.00,45.00,0
";

struct Fixture {
    _dir: TempDir,
    config: AnalyzerConfig,
}

impl Fixture {
    fn new(csv: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.csv");
        fs::write(&input, csv).unwrap();

        let config = AnalyzerConfig {
            input_path: input,
            output_dir: dir.path().join("out"),
            ..AnalyzerConfig::default()
        };
        Self { _dir: dir, config }
    }

    fn out(&self, name: &str) -> PathBuf {
        self.config.output_dir.join(name)
    }
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn full_run_writes_dataset_reports_and_log() {
    let fx = Fixture::new(SALES);
    let run = execute(&fx.config).unwrap();

    // 9 input rows: 1 duplicate, 1 negative quantity, 1 missing revenue, 1 bad date.
    assert_eq!(run.dataset.original_rows(), 9);
    assert_eq!(run.dataset.len(), 5);

    let mut expected: Vec<String> = ReportKind::ALL.iter().map(|k| k.file_name()).collect();
    expected.push("analysis_log.csv".to_string());
    expected.push("cleaned_sales_data.csv".to_string());
    expected.sort();
    assert_eq!(output_files(&fx.config.output_dir), expected);
    assert_eq!(run.written.len(), expected.len());

    let cleaned = lines(&fx.out("cleaned_sales_data.csv"));
    assert_eq!(
        cleaned[0],
        "Date,Product,Customer,Category,Region,Sales,Cost,Quantity,profit,profit_margin,avg_unit_price,year,month,quarter"
    );
    assert_eq!(cleaned.len(), 6);

    // Zero revenue keeps the row with an empty margin; zero quantity an empty unit price.
    let sprocket = cleaned.iter().find(|l| l.contains("Sprocket")).unwrap();
    assert!(sprocket.ends_with(",-5,,0,2024,2,1"), "{sprocket}");
    let zero_qty = cleaned.iter().find(|l| l.starts_with("2024-03-28")).unwrap();
    assert!(zero_qty.ends_with(",45,0.5,,2024,3,1"), "{zero_qty}");

    let log = &run.log;
    assert!(log.contains(step::LOAD, "loaded 9 rows with 8 columns"));
    assert!(log.contains(step::MISSING_VALUES, "dropped 1 row with missing revenue/cost/quantity"));
    assert!(log.contains(step::DUPLICATES, "dropped 1 duplicate row"));
    assert!(log.contains(step::INVALID_VALUES, "dropped 1 row with negative quantity"));
    assert!(log.contains(step::DATE_PARSING, "dropped 1 row with missing or unparseable dates"));
    assert!(log.contains(step::DERIVED_COLUMNS, "profit_margin skipped for 1 row with zero revenue"));
    assert!(log.contains(step::DERIVED_COLUMNS, "avg_unit_price skipped for 1 row with zero quantity"));

    let log_file = lines(&fx.out("analysis_log.csv"));
    assert_eq!(log_file[0], "step,message");
    assert_eq!(log_file.len(), run.log.len() + 1);
    assert!(log_file[1].starts_with("load,"));
}

#[test]
fn report_contents() {
    let fx = Fixture::new(SALES);
    let run = execute(&fx.config).unwrap();

    let top = lines(&fx.out("top_products.csv"));
    assert_eq!(top[0], "product,transactions,total_revenue,total_quantity,total_profit");
    assert_eq!(top[1], "Widget,2,160.00,4.00,55.00");

    let loyal = lines(&fx.out("loyal_customers.csv"));
    assert_eq!(loyal[1], "alice,2,160.00,80.00");
    assert_eq!(loyal[2], "bob,2,150.50,75.25");
    assert_eq!(loyal.len(), 3);

    let trend = lines(&fx.out("profitability_trend.csv"));
    assert_eq!(trend[0], "period,transactions,revenue,cost,profit,profit_margin");
    assert_eq!(&trend[1..], ["2024-01,2,180.50,100.25,80.25,0.44", "2024-02,2,40.00,30.00,10.00,0.25", "2024-03,1,90.00,45.00,45.00,0.50"]);

    let summary = run.reports.summary.as_ref().unwrap();
    assert_eq!(summary.total_transactions, 5);
    assert_eq!(summary.rows_removed, 4);
    assert!((summary.total_revenue - 310.5).abs() < 1e-9);
    assert_eq!(summary.max_transaction_value, 120.0);
    assert_eq!(summary.min_transaction_value, 0.0);

    let final_report = lines(&fx.out("final_report.csv"));
    assert_eq!(final_report[0], "metric,value");
    assert!(final_report.contains(&"total_transactions,5".to_string()));
    assert!(final_report.contains(&"original_rows,9".to_string()));
    assert!(final_report.contains(&"total_revenue,310.50".to_string()));
    assert!(final_report.iter().any(|l| l.starts_with("average_profit_margin,")));
}

#[test]
fn header_only_input_is_fatal_and_writes_only_the_log() {
    let fx = Fixture::new("Date,Sales,Cost,Quantity\n");
    let err = execute(&fx.config).unwrap_err();

    assert!(matches!(err, AppError::Fatal(CleanError::NoData)));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(output_files(&fx.config.output_dir), ["analysis_log.csv"]);

    let log = lines(&fx.out("analysis_log.csv"));
    assert!(log.last().unwrap().starts_with("fatal,no data"));
}

#[test]
fn no_amount_columns_is_fatal() {
    let fx = Fixture::new("Date,Product\n2024-01-01,Widget\n");
    let err = execute(&fx.config).unwrap_err();

    assert!(matches!(err, AppError::Fatal(CleanError::NoAmountColumns)));
    assert_eq!(output_files(&fx.config.output_dir), ["analysis_log.csv"]);
}

#[test]
fn zero_byte_input_is_fatal_no_data() {
    let fx = Fixture::new("");
    let err = execute(&fx.config).unwrap_err();

    assert!(matches!(err, AppError::Fatal(CleanError::NoData)));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(output_files(&fx.config.output_dir), ["analysis_log.csv"]);
}

#[test]
fn missing_input_file_fails_before_cleaning() {
    let mut fx = Fixture::new("");
    fx.config.input_path = fx.config.input_path.with_file_name("does_not_exist.csv");

    let err = execute(&fx.config).unwrap_err();
    assert!(matches!(err, AppError::Load(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(!fx.config.output_dir.exists());
}

#[test]
fn absent_date_column_skips_date_outputs() {
    let fx = Fixture::new(
        "Product,Region,Revenue,Cost,Qty\nWidget,North,10,4,2\nGadget,South,20,5,1\n",
    );
    let run = execute(&fx.config).unwrap();

    let cleaned = lines(&fx.out("cleaned_sales_data.csv"));
    assert_eq!(cleaned[0], "Product,Region,Revenue,Cost,Qty,profit,profit_margin,avg_unit_price");

    for kind in [
        ReportKind::ProfitabilityTrend,
        ReportKind::RegionalMonthlySales,
        ReportKind::MonthSummary,
    ] {
        assert!(!fx.out(&kind.file_name()).exists());
    }
    assert!(fx.out("region_summary.csv").exists());
    assert!(run.log.contains(step::DATE_PARSING, "no date column found"));
}

#[test]
fn stale_reports_are_removed_on_fatal_run() {
    let fx = Fixture::new(SALES);
    execute(&fx.config).unwrap();
    assert!(fx.out("top_products.csv").exists());

    fs::write(&fx.config.input_path, "Date,Sales,Cost,Quantity\n").unwrap();
    assert!(execute(&fx.config).is_err());
    assert_eq!(output_files(&fx.config.output_dir), ["analysis_log.csv"]);
}

#[test]
fn cleaning_the_cleaned_output_removes_nothing() {
    let fx = Fixture::new(SALES);
    let first = execute(&fx.config).unwrap();

    let second_config = AnalyzerConfig {
        input_path: fx.out("cleaned_sales_data.csv"),
        output_dir: fx.config.output_dir.join("second"),
        ..AnalyzerConfig::default()
    };
    let second = execute(&second_config).unwrap();

    assert_eq!(second.dataset.len(), first.dataset.len());
    assert!(second.log.contains(step::MISSING_VALUES, "dropped 0 rows"));
    assert!(second.log.contains(step::DUPLICATES, "dropped 0 duplicate rows"));
    assert!(second.log.contains(step::INVALID_VALUES, "no rows with negative"));
    assert_eq!(
        lines(&fx.out("cleaned_sales_data.csv")),
        lines(&second_config.output_dir.join("cleaned_sales_data.csv"))
    );
}
