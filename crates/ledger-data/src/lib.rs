//! Booking ledger ingestion and queries.
//!
//! Responsible for reading the ledger CSV file into bookings, computing the
//! billed-revenue, longest-stay and top-client aggregates, and packaging them
//! into a report.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use aggregator::{longest_stays, top_client, total_billed};
pub use ledger_core as core;
pub use reader::load_bookings;
