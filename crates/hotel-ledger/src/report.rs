//! Rendering of a [`LedgerReport`] for the terminal.

use std::fmt::Write;

use ledger_core::formatting::{format_amount, format_date_range};
use ledger_data::analysis::LedgerReport;

/// Plain-text summary of the report.
pub fn render_text(report: &LedgerReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Bookings loaded: {}", report.bookings_loaded);
    let _ = writeln!(
        out,
        "Total billed ({}): {}",
        format_date_range(&report.range),
        format_amount(report.total_billed)
    );

    let _ = writeln!(out);
    if report.longest_stays.is_empty() {
        let _ = writeln!(out, "Longest stays: none");
    } else {
        let _ = writeln!(out, "Longest stays:");
        for (rank, stay) in report.longest_stays.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} (check-in {})",
                rank + 1,
                stay.guest_name,
                stay.check_in
            );
        }
    }

    let _ = writeln!(out);
    let scope = if report.services.is_empty() {
        "all services".to_string()
    } else {
        report.services.join(", ")
    };
    match &report.top_client {
        Some(top) => {
            let _ = writeln!(
                out,
                "Top client ({}): {} with {}",
                scope,
                top.guest_id,
                format_amount(top.revenue)
            );
        }
        None => {
            let _ = writeln!(out, "Top client ({}): none", scope);
        }
    }
    let _ = write!(out, "Qualifying clients: {}", report.qualifying_clients);

    out
}

/// Pretty-printed JSON form of the report.
pub fn render_json(report: &LedgerReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
