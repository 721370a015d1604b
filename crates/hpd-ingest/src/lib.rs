//! hpd-ingest
//!
//! Input side of the holding-period report: reads the ledger CSV, resolves
//! calendar dates onto the matching day axis, and splits rows into ledger
//! transactions and terminal valuations. Malformed rows are dropped here so
//! the matcher never sees them.

pub mod day;
pub mod loader;

pub use day::{parse_date, resolve_day, DayBasis, DEFAULT_DATE_FORMAT};
pub use loader::{
    load_ledger_file, parse_ledger_reader, parse_ledger_str, LoadError, LoadReport, LoadedLedger,
    LoaderOptions, SkipReason, SkippedRow,
};
