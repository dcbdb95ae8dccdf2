mod bootstrap;
mod report;

use anyhow::Result;
use ledger_core::error::LedgerError;
use ledger_core::settings::Settings;
use ledger_data::analysis::{analyze_ledger, ReportOptions};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Hotel Ledger v{} starting", env!("CARGO_PKG_VERSION"));

    let ledger_path = match settings.file.clone() {
        Some(path) => path,
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| bootstrap::discover_ledger_file(&dir))
            .ok_or_else(|| {
                LedgerError::Config(
                    "no ledger file given and no bookings.csv found in the current directory"
                        .to_string(),
                )
            })?,
    };
    tracing::info!("Reading ledger {}", ledger_path.display());

    let options = ReportOptions::from(&settings);
    let report = analyze_ledger(&ledger_path, &options)?;

    let output = match settings.format.as_str() {
        "json" => report::render_json(&report)?,
        _ => report::render_text(&report),
    };
    println!("{}", output);

    Ok(())
}
