//! Shared types for the hotel ledger: the booking model, error type,
//! output formatting helpers and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{LedgerError, Result};
pub use models::{Booking, DateRange};
