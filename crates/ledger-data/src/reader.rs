//! Ledger file loading.
//!
//! Reads the comma-separated booking ledger and converts each record into a
//! [`Booking`]. The first line is a header and is always discarded. Loading
//! is all-or-nothing: the first malformed record aborts it.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use ledger_core::error::{LedgerError, Result};
use ledger_core::models::Booking;
use tracing::{debug, warn};

/// Number of columns every booking record carries.
pub const FIELD_COUNT: usize = 8;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every booking from the ledger file at `path`, in file order.
///
/// Fails with [`LedgerError::FileAccess`] when the file cannot be opened or
/// read and with [`LedgerError::Format`] on the first malformed record.
pub fn load_bookings(path: &Path) -> Result<Vec<Booking>> {
    let file = std::fs::File::open(path).map_err(|source| {
        warn!("Failed to open ledger {}: {}", path.display(), source);
        LedgerError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    })?;

    match read_bookings(file) {
        Ok(bookings) => {
            debug!(
                "Loaded {} bookings from {}",
                bookings.len(),
                path.display()
            );
            Ok(bookings)
        }
        Err(LedgerError::Io(source)) => {
            warn!("Failed to read ledger {}: {}", path.display(), source);
            Err(LedgerError::FileAccess {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(e) => {
            warn!("Rejected ledger {}: {}", path.display(), e);
            Err(e)
        }
    }
}

/// Parse bookings from any byte source using the same rules as
/// [`load_bookings`].
pub fn read_bookings<R: Read>(mut source: R) -> Result<Vec<Booking>> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;

    // The csv reader drops empty lines; they are malformed records here.
    let blank_line = first_blank_line(&data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true) // header row is consumed, never validated
        .flexible(true) // field count is checked per record below
        .from_reader(data.as_slice());

    let mut bookings = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        // A record read past a skipped line starts at or after that line.
        if let Some(blank) = blank_line.filter(|&b| line >= b) {
            return Err(empty_record(blank));
        }
        bookings.push(parse_record(&record, line)?);
    }

    if let Some(blank) = blank_line {
        return Err(empty_record(blank));
    }

    Ok(bookings)
}

/// Split the raw services column into trimmed labels.
///
/// An empty column yields no services. Otherwise every comma-separated token
/// is kept, including empty ones, in input order.
pub fn parse_services(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert one CSV record into a [`Booking`].
fn parse_record(record: &StringRecord, line: u64) -> Result<Booking> {
    if record.len() != FIELD_COUNT {
        return Err(LedgerError::format(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, record.len()),
        ));
    }

    // Length checked above, indexing cannot go out of bounds.
    Ok(Booking {
        guest_name: record[0].to_string(),
        guest_id: record[1].to_string(),
        check_in: parse_date(&record[2], "check-in date", line)?,
        check_out: parse_date(&record[3], "check-out date", line)?,
        room_type: record[4].to_string(),
        occupant_count: parse_occupants(&record[5], line)?,
        nightly_rate: parse_rate(&record[6], line)?,
        extra_services: parse_services(&record[7]),
    })
}

fn parse_date(value: &str, field: &str, line: u64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        LedgerError::format(
            line,
            format!("invalid {} '{}' (expected YYYY-MM-DD): {}", field, value, e),
        )
    })
}

fn parse_occupants(value: &str, line: u64) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|e| {
        LedgerError::format(line, format!("invalid occupant count '{}': {}", value, e))
    })
}

fn parse_rate(value: &str, line: u64) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|e| {
        LedgerError::format(line, format!("invalid nightly rate '{}': {}", value, e))
    })
}

/// 1-based number of the first empty line outside a quoted field.
///
/// The position just past a final newline is end of input, not a line.
fn first_blank_line(data: &[u8]) -> Option<u64> {
    let mut line = 1u64;
    let mut empty = true;
    let mut in_quotes = false;

    for &byte in data {
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                empty = false;
            }
            b'\n' if in_quotes => line += 1,
            b'\n' => {
                if empty {
                    return Some(line);
                }
                line += 1;
                empty = true;
            }
            b'\r' => {}
            _ => empty = false,
        }
    }
    None
}

fn empty_record(line: u64) -> LedgerError {
    LedgerError::format(line, format!("expected {} fields, found 0", FIELD_COUNT))
}

/// Map a CSV reader error onto the ledger error kinds.
fn csv_error(err: csv::Error) -> LedgerError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LedgerError::Io(source),
        other => LedgerError::format(line, format!("unreadable record: {:?}", other)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "nombre,dni,fecha_entrada,fecha_salida,tipo_habitacion,num_personas,precio_noche,servicios_adicionales";

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_ledger(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    // ── load_bookings ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_bookings_round_trip_empty_services() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(
            dir.path(),
            "bookings.csv",
            &[HEADER, "Ana Torres,12345678A,2024-01-01,2024-01-04,double,2,100.5,"],
        );

        let bookings = load_bookings(&path).unwrap();

        assert_eq!(bookings.len(), 1);
        let b = &bookings[0];
        assert_eq!(b.guest_name, "Ana Torres");
        assert_eq!(b.guest_id, "12345678A");
        assert_eq!(b.check_in, date("2024-01-01"));
        assert_eq!(b.check_out, date("2024-01-04"));
        assert_eq!(b.room_type, "double");
        assert_eq!(b.occupant_count, 2);
        assert!((b.nightly_rate - 100.5).abs() < 1e-9);
        assert!(b.extra_services.is_empty());
    }

    #[test]
    fn test_load_bookings_quoted_services() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(
            dir.path(),
            "bookings.csv",
            &[
                HEADER,
                "Luis Gil,87654321B,2024-05-01,2024-05-03,suite,1,250,\"spa, breakfast,spa\"",
            ],
        );

        let bookings = load_bookings(&path).unwrap();
        assert_eq!(
            bookings[0].extra_services,
            vec!["spa".to_string(), "breakfast".to_string(), "spa".to_string()]
        );
    }

    #[test]
    fn test_load_bookings_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(
            dir.path(),
            "bookings.csv",
            &[
                HEADER,
                "C,3,2024-03-01,2024-03-02,single,1,60,",
                "A,1,2024-01-01,2024-01-02,single,1,60,",
                "B,2,2024-02-01,2024-02-02,single,1,60,",
            ],
        );

        let names: Vec<String> = load_bookings(&path)
            .unwrap()
            .into_iter()
            .map(|b| b.guest_name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_load_bookings_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(dir.path(), "bookings.csv", &[HEADER]);
        assert!(load_bookings(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_bookings_header_not_validated() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(
            dir.path(),
            "bookings.csv",
            &["whatever", "A,1,2024-01-01,2024-01-02,single,1,60,"],
        );
        assert_eq!(load_bookings(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_load_bookings_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load_bookings(&path).unwrap_err();
        match err {
            LedgerError::FileAccess { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }

    #[test]
    fn test_load_bookings_seven_fields_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_ledger(
            dir.path(),
            "bookings.csv",
            &[
                HEADER,
                "A,1,2024-01-01,2024-01-02,single,1,60,",
                "B,2,2024-01-01,2024-01-02,single,1,60",
            ],
        );

        let err = load_bookings(&path).unwrap_err();
        match err {
            LedgerError::Format { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 7"), "reason = {reason}");
            }
            other => panic!("expected Format, got {other:?}"),
        }
    }

    // ── read_bookings ─────────────────────────────────────────────────────────

    #[test]
    fn test_read_bookings_bad_date() {
        let data = format!("{HEADER}\nA,1,01/02/2024,2024-01-03,single,1,60,\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("check-in date"));
    }

    #[test]
    fn test_read_bookings_bad_checkout_date() {
        let data = format!("{HEADER}\nA,1,2024-01-01,2024-13-03,single,1,60,\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("check-out date"));
    }

    #[test]
    fn test_read_bookings_non_integer_occupants() {
        let data = format!("{HEADER}\nA,1,2024-01-01,2024-01-03,single,2.5,60,\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("occupant count"));
    }

    #[test]
    fn test_read_bookings_non_numeric_rate() {
        let data = format!("{HEADER}\nA,1,2024-01-01,2024-01-03,single,2,cheap,\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("nightly rate"));
    }

    #[test]
    fn test_read_bookings_numeric_whitespace_tolerated() {
        let data = format!("{HEADER}\nA,1,2024-01-01,2024-01-03,single, 2 , 75.25 ,gym\n");
        let bookings = read_bookings(data.as_bytes()).unwrap();
        assert_eq!(bookings[0].occupant_count, 2);
        assert!((bookings[0].nightly_rate - 75.25).abs() < 1e-9);
        assert_eq!(bookings[0].extra_services, vec!["gym".to_string()]);
    }

    #[test]
    fn test_read_bookings_too_many_fields() {
        let data = format!("{HEADER}\nA,1,2024-01-01,2024-01-03,single,2,60,spa,gym\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("found 9"));
    }

    #[test]
    fn test_read_bookings_invalid_utf8_is_format_error() {
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"A\xff,1,2024-01-01,2024-01-03,single,2,60,\n");
        let err = read_bookings(data.as_slice()).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_read_bookings_blank_line_fails() {
        let data = format!(
            "{HEADER}\nA,1,2024-01-01,2024-01-02,single,1,60,\n\nB,2,2024-01-01,2024-01-02,single,1,60,\n"
        );
        let err = read_bookings(data.as_bytes()).unwrap_err();
        match err {
            LedgerError::Format { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "expected 8 fields, found 0");
            }
            other => panic!("expected Format, got {other:?}"),
        }
    }

    #[test]
    fn test_read_bookings_trailing_blank_line_fails() {
        let data = format!("{HEADER}\r\nA,1,2024-01-01,2024-01-02,single,1,60,\r\n\r\n");
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Format { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn test_read_bookings_earlier_bad_row_reported_before_blank_line() {
        let data = format!(
            "{HEADER}\nA,1,2024-01-01,2024-01-02,single,1\n\nB,2,2024-01-01,2024-01-02,single,1,60,\n"
        );
        let err = read_bookings(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("found 6"), "{err}");
    }

    #[test]
    fn test_read_bookings_final_newline_accepted() {
        let with = format!("{HEADER}\nA,1,2024-01-01,2024-01-02,single,1,60,\n");
        let without = format!("{HEADER}\nA,1,2024-01-01,2024-01-02,single,1,60,");
        assert_eq!(read_bookings(with.as_bytes()).unwrap().len(), 1);
        assert_eq!(read_bookings(without.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_read_bookings_newline_inside_quotes_is_not_blank() {
        let data = format!(
            "{HEADER}\nA,1,2024-01-01,2024-01-02,single,1,60,\"spa,\n\nbreakfast\"\n"
        );
        let bookings = read_bookings(data.as_bytes()).unwrap();
        assert_eq!(bookings[0].extra_services, vec!["spa", "breakfast"]);
    }

    // ── first_blank_line ──────────────────────────────────────────────────────

    #[test]
    fn test_first_blank_line() {
        assert_eq!(first_blank_line(b""), None);
        assert_eq!(first_blank_line(b"h\na\n"), None);
        assert_eq!(first_blank_line(b"h\n\na\n"), Some(2));
        assert_eq!(first_blank_line(b"\nh\n"), Some(1));
        assert_eq!(first_blank_line(b"h\n\"x\n\ny\"\n\n"), Some(5));
    }

    // ── parse_services ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_services_empty() {
        assert!(parse_services("").is_empty());
    }

    #[test]
    fn test_parse_services_trims_and_keeps_order() {
        assert_eq!(
            parse_services(" spa ,breakfast , parking"),
            vec!["spa", "breakfast", "parking"]
        );
    }

    #[test]
    fn test_parse_services_keeps_empty_tokens_and_duplicates() {
        assert_eq!(parse_services("spa,,spa"), vec!["spa", "", "spa"]);
        assert_eq!(parse_services(" "), vec![""]);
    }
}
