use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single reservation read from a ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Name of the guest the booking is made out to.
    pub guest_name: String,
    /// Client identifier; bookings sharing it belong to the same client.
    pub guest_id: String,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date. Expected to be on or after `check_in`, not enforced.
    pub check_out: NaiveDate,
    /// Free-form room category label.
    pub room_type: String,
    /// Number of people staying.
    pub occupant_count: u32,
    /// Price charged per night.
    pub nightly_rate: f64,
    /// Add-on service labels in input order, duplicates kept.
    #[serde(default)]
    pub extra_services: Vec<String>,
}

impl Booking {
    /// Whole days between check-in and check-out.
    ///
    /// Zero for a same-day stay and negative when `check_out` precedes
    /// `check_in`.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Amount billed for the stay: `nights × nightly_rate`.
    pub fn revenue(&self) -> f64 {
        self.nights() as f64 * self.nightly_rate
    }

    /// `true` when any of the booking's services is in `services`.
    pub fn has_any_service(&self, services: &HashSet<String>) -> bool {
        self.extra_services.iter().any(|s| services.contains(s))
    }
}

/// Inclusive check-in date window. A missing bound does not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A range with neither bound set.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| s <= date) && self.end.map_or(true, |e| date <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_booking(check_in: &str, check_out: &str, rate: f64, services: &[&str]) -> Booking {
        Booking {
            guest_name: "Ana Torres".to_string(),
            guest_id: "12345678A".to_string(),
            check_in: date(check_in),
            check_out: date(check_out),
            room_type: "double".to_string(),
            occupant_count: 2,
            nightly_rate: rate,
            extra_services: services.iter().map(|s| s.to_string()).collect(),
        }
    }

    // ── Booking ───────────────────────────────────────────────────────────────

    #[test]
    fn test_nights_and_revenue() {
        let b = make_booking("2024-01-01", "2024-01-04", 100.0, &[]);
        assert_eq!(b.nights(), 3);
        assert!((b.revenue() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_stay_is_zero_nights() {
        let b = make_booking("2024-03-10", "2024-03-10", 80.0, &[]);
        assert_eq!(b.nights(), 0);
        assert_eq!(b.revenue(), 0.0);
    }

    #[test]
    fn test_inverted_dates_yield_negative_revenue() {
        let b = make_booking("2024-03-10", "2024-03-08", 50.0, &[]);
        assert_eq!(b.nights(), -2);
        assert!((b.revenue() + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nights_across_month_boundary() {
        let b = make_booking("2024-02-27", "2024-03-02", 10.0, &[]);
        // 2024 is a leap year.
        assert_eq!(b.nights(), 4);
    }

    #[test]
    fn test_has_any_service() {
        let b = make_booking("2024-01-01", "2024-01-02", 10.0, &["spa", "breakfast"]);
        let wanted: HashSet<String> = ["gym", "spa"].iter().map(|s| s.to_string()).collect();
        let other: HashSet<String> = ["Spa"].iter().map(|s| s.to_string()).collect();
        assert!(b.has_any_service(&wanted));
        assert!(!b.has_any_service(&other), "matching is case sensitive");
        assert!(!b.has_any_service(&HashSet::new()));
    }

    // ── DateRange ─────────────────────────────────────────────────────────────

    #[test]
    fn test_date_range_closed_interval() {
        let range = DateRange::new(Some(date("2024-01-01")), Some(date("2024-01-31")));
        assert!(range.contains(date("2024-01-01")));
        assert!(range.contains(date("2024-01-31")));
        assert!(!range.contains(date("2023-12-31")));
        assert!(!range.contains(date("2024-02-01")));
    }

    #[test]
    fn test_date_range_open_sides() {
        let from = DateRange::new(Some(date("2024-06-01")), None);
        assert!(from.contains(date("2030-01-01")));
        assert!(!from.contains(date("2024-05-31")));

        let until = DateRange::new(None, Some(date("2024-06-01")));
        assert!(until.contains(date("1999-01-01")));
        assert!(!until.contains(date("2024-06-02")));

        assert!(DateRange::unbounded().contains(date("2024-06-01")));
    }
}
