//! Sales Analyzer - sales CSV cleaning, derived metrics & tabular reports.

use std::process::ExitCode;

use sales_analyzer::error::AppError;

fn main() -> ExitCode {
    match sales_analyzer::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
