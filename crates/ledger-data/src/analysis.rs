//! Report pipeline: load a ledger and run every query over it.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use ledger_core::error::Result;
use ledger_core::models::{Booking, DateRange};
use ledger_core::settings::{Settings, DEFAULT_LONGEST_STAYS};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{client_totals, longest_stays, total_billed_in};
use crate::reader::load_bookings;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parameters for a report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Check-in window for the billed total.
    pub range: DateRange,
    /// How many of the longest stays to list.
    pub longest: usize,
    /// Services that qualify a booking for the top-client query.
    /// Empty means every booking qualifies.
    pub services: HashSet<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            range: DateRange::unbounded(),
            longest: DEFAULT_LONGEST_STAYS,
            services: HashSet::new(),
        }
    }
}

impl From<&Settings> for ReportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            range: settings.date_range(),
            longest: settings.top,
            services: settings.service_filter(),
        }
    }
}

/// One row of the longest-stay ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayEntry {
    pub guest_name: String,
    pub check_in: NaiveDate,
}

/// Client with the highest revenue among qualifying bookings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopClient {
    pub guest_id: String,
    pub revenue: f64,
}

/// The complete output of [`analyze_ledger`].
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    /// Number of bookings the ledger held.
    pub bookings_loaded: usize,
    /// Check-in window used for `total_billed`.
    pub range: DateRange,
    pub total_billed: f64,
    pub longest_stays: Vec<StayEntry>,
    /// Service filter applied to `top_client`, sorted for stable output.
    pub services: Vec<String>,
    /// Distinct clients with at least one qualifying booking.
    pub qualifying_clients: usize,
    /// `None` when no booking qualified.
    pub top_client: Option<TopClient>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Load the ledger at `path` and build a [`LedgerReport`] from it.
pub fn analyze_ledger(path: &Path, options: &ReportOptions) -> Result<LedgerReport> {
    let bookings = load_bookings(path)?;
    Ok(build_report(&bookings, options))
}

/// Run all queries over bookings that are already in memory.
pub fn build_report(bookings: &[Booking], options: &ReportOptions) -> LedgerReport {
    let billed = total_billed_in(bookings, &options.range);

    let stays = longest_stays(bookings, options.longest)
        .into_iter()
        .map(|(guest_name, check_in)| StayEntry {
            guest_name,
            check_in,
        })
        .collect();

    let totals = client_totals(bookings, Some(&options.services));
    let top_client = totals.top().map(|(guest_id, revenue)| TopClient {
        guest_id: guest_id.to_string(),
        revenue,
    });

    let mut services: Vec<String> = options.services.iter().cloned().collect();
    services.sort();

    debug!(
        "Report over {} bookings: billed {:.2}, {} qualifying clients",
        bookings.len(),
        billed,
        totals.len()
    );

    LedgerReport {
        bookings_loaded: bookings.len(),
        range: options.range,
        total_billed: billed,
        longest_stays: stays,
        services,
        qualifying_clients: totals.len(),
        top_client,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
