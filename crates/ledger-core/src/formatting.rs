use crate::models::DateRange;

/// Format a number with thousands separators and a fixed number of decimal
/// places.
///
/// # Examples
///
/// ```
/// use ledger_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // A value that rounds to zero prints without a sign.
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a monetary amount with two decimal places and thousands
/// separators. No currency symbol is attached.
///
/// # Examples
///
/// ```
/// use ledger_core::formatting::format_amount;
///
/// assert_eq!(format_amount(1234.5), "1,234.50");
/// assert_eq!(format_amount(0.0), "0.00");
/// ```
pub fn format_amount(amount: f64) -> String {
    format_number(amount, 2)
}

/// Human-readable form of a check-in window.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ledger_core::formatting::format_date_range;
/// use ledger_core::models::DateRange;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1);
/// assert_eq!(format_date_range(&DateRange::new(start, None)), "from 2024-01-01");
/// assert_eq!(format_date_range(&DateRange::unbounded()), "all dates");
/// ```
pub fn format_date_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (Some(s), Some(e)) => format!("{} to {}", s, e),
        (Some(s), None) => format!("from {}", s),
        (None, Some(e)) => format!("until {}", e),
        (None, None) => "all dates".to_string(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
