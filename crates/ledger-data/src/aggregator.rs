//! Aggregate queries over an in-memory ledger.
//!
//! All queries borrow the bookings and never modify them, so they can be
//! called repeatedly (or from several readers) over the same slice.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use ledger_core::models::{Booking, DateRange};

// ── ClientTotals ──────────────────────────────────────────────────────────────

/// Revenue accumulated per client id, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ClientTotals {
    totals: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl ClientTotals {
    /// Add a booking's revenue to its client's running total.
    pub fn add_booking(&mut self, booking: &Booking) {
        self.add(&booking.guest_id, booking.revenue());
    }

    /// Insert `id` with `amount` or accumulate onto its existing total.
    pub fn add(&mut self, id: &str, amount: f64) {
        match self.index.get(id) {
            Some(&i) => self.totals[i].1 += amount,
            None => {
                self.index.insert(id.to_string(), self.totals.len());
                self.totals.push((id.to_string(), amount));
            }
        }
    }

    /// Number of distinct clients.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Client with the highest total. Ties go to the client seen first.
    pub fn top(&self) -> Option<(&str, f64)> {
        if self.is_empty() {
            return None;
        }
        let mut best: Option<(&str, f64)> = None;
        for (id, total) in &self.totals {
            match best {
                Some((_, best_total)) if *total <= best_total => {}
                _ => best = Some((id.as_str(), *total)),
            }
        }
        best
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Revenue of every booking whose check-in lies in `[start, end]`.
///
/// A `None` bound leaves that side open. Returns `0.0` when nothing matches.
pub fn total_billed(
    bookings: &[Booking],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> f64 {
    total_billed_in(bookings, &DateRange::new(start, end))
}

/// [`total_billed`] with the window given as a [`DateRange`].
pub fn total_billed_in(bookings: &[Booking], range: &DateRange) -> f64 {
    bookings
        .iter()
        .filter(|b| range.contains(b.check_in))
        .map(Booking::revenue)
        .sum()
}

/// The `n` longest stays as `(guest_name, check_in)`, longest first.
///
/// Bookings with the same number of nights keep their input order.
pub fn longest_stays(bookings: &[Booking], n: usize) -> Vec<(String, NaiveDate)> {
    let mut ranked: Vec<&Booking> = bookings.iter().collect();
    // `sort_by` is stable, which keeps ties in input order.
    ranked.sort_by(|a, b| b.nights().cmp(&a.nights()));

    ranked
        .into_iter()
        .take(n)
        .map(|b| (b.guest_name.clone(), b.check_in))
        .collect()
}

/// Client id with the highest accumulated revenue.
///
/// When `services` holds at least one label, only bookings carrying one of
/// those services count. Returns `("", 0.0)` if no booking qualifies.
pub fn top_client(bookings: &[Booking], services: Option<&HashSet<String>>) -> (String, f64) {
    client_totals(bookings, services)
        .top()
        .map(|(id, total)| (id.to_string(), total))
        .unwrap_or_else(|| (String::new(), 0.0))
}

/// Per-client revenue of the bookings that pass the service filter.
pub fn client_totals(bookings: &[Booking], services: Option<&HashSet<String>>) -> ClientTotals {
    let filter = services.filter(|s| !s.is_empty());

    let mut totals = ClientTotals::default();
    for booking in bookings {
        if filter.map_or(true, |wanted| booking.has_any_service(wanted)) {
            totals.add_booking(booking);
        }
    }
    totals
}

// ── Tests ─────────────────────────────────────────────────────────────────────
