//! Ledger CSV loader.
//!
//! Row layout (no header required, extra columns ignored):
//!
//! | # | Column       | Example      | Notes                                   |
//! |---|--------------|--------------|-----------------------------------------|
//! | 0 | `date`       | `15/3/2024`  | Parsed with [`LoaderOptions::date_format`] |
//! | 1 | `instrument` | `ACME`       | Empty => row ignored                    |
//! | 2 | `quantity`   | `-25`        | Signed; empty => terminal valuation row |
//! | 3 | `price`      | `12.40`      | Per-unit price                          |
//!
//! A negative quantity is a disposal of its absolute value, a positive one an
//! acquisition. A zero quantity moves nothing and the row is skipped, as is a
//! valuation row whose price is negative or not finite. Rows that cannot be parsed are skipped and counted in the
//! [`LoadReport`]; only structural failures are returned as `Err`. A header
//! row therefore needs no special handling: its date does not parse.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Datelike;
use hpd_lots::{Ledger, Side, TerminalValuations, Transaction, QUANTITY_EPSILON};
use serde::Serialize;
use tracing::{debug, warn};

use crate::day::{parse_date, resolve_day, DayBasis, DEFAULT_DATE_FORMAT};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural loader failures. Row-level problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Io(String),
    Csv(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "io error: {e}"),
            LoadError::Csv(e) => write!(f, "csv error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderOptions {
    /// chrono format string for column 0.
    pub date_format: String,
    pub day_basis: DayBasis,
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            day_basis: DayBasis::default(),
            delimiter: b',',
        }
    }
}

/// Why a row was left out of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum SkipReason {
    TooFewFields,
    EmptyInstrument,
    BadDate(String),
    BadQuantity(String),
    /// Quantity is zero (within epsilon): the row moves nothing.
    ZeroQuantity(String),
    BadPrice(String),
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields => write!(f, "fewer than 4 fields"),
            SkipReason::EmptyInstrument => write!(f, "empty instrument"),
            SkipReason::BadDate(v) => write!(f, "unparseable date '{v}'"),
            SkipReason::BadQuantity(v) => write!(f, "invalid quantity '{v}'"),
            SkipReason::ZeroQuantity(v) => write!(f, "zero quantity '{v}'"),
            SkipReason::BadPrice(v) => write!(f, "invalid price '{v}'"),
            SkipReason::Malformed(e) => write!(f, "malformed row: {e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the input.
    pub line: u64,
    pub reason: SkipReason,
}

/// Row coverage of one load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    /// Rows that became ledger transactions.
    pub rows_ok: usize,
    /// Rows that set a terminal valuation.
    pub rows_valuation: usize,
    pub rows_skipped: usize,
    pub skipped: Vec<SkippedRow>,
    /// Calendar years seen on transaction rows (ascending).
    pub years: Vec<i32>,
}

impl LoadReport {
    /// Transactions span more than one calendar year.
    pub fn spans_multiple_years(&self) -> bool {
        self.years.len() > 1
    }
}

/// Output of a load: ledger, terminal valuations and coverage.
#[derive(Clone, Debug, Default)]
pub struct LoadedLedger {
    pub ledger: Ledger,
    pub valuations: TerminalValuations,
    pub report: LoadReport,
}

enum Row {
    Trade { instrument: String, tx: Transaction },
    Valuation { instrument: String, price: f64 },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load a ledger CSV from disk.
pub fn load_ledger_file(
    path: impl AsRef<Path>,
    opts: &LoaderOptions,
) -> Result<LoadedLedger, LoadError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| LoadError::Io(format!("open '{}': {e}", path.display())))?;
    parse_ledger_reader(file, opts)
}

/// Parse a ledger from CSV text (useful for tests without touching the
/// filesystem).
pub fn parse_ledger_str(src: &str, opts: &LoaderOptions) -> Result<LoadedLedger, LoadError> {
    parse_ledger_reader(src.as_bytes(), opts)
}

/// Parse a ledger from any reader. See the module docs for the row contract.
pub fn parse_ledger_reader<R: Read>(
    reader: R,
    opts: &LoaderOptions,
) -> Result<LoadedLedger, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(opts.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = LoadedLedger::default();
    let mut years: BTreeSet<i32> = BTreeSet::new();

    for (idx0, rec) in rdr.records().enumerate() {
        out.report.rows_read += 1;
        let fallback_line = idx0 as u64 + 1;

        let rec = match rec {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(LoadError::Csv(e.to_string())),
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                skip(&mut out.report, line, SkipReason::Malformed(e.to_string()));
                continue;
            }
        };
        let line = rec.position().map_or(fallback_line, |p| p.line());

        match parse_row(&rec, opts, &mut years) {
            Ok(Row::Trade { instrument, tx }) => {
                out.report.rows_ok += 1;
                out.ledger.push(instrument, tx);
            }
            Ok(Row::Valuation { instrument, price }) => {
                out.report.rows_valuation += 1;
                out.valuations.insert(instrument, price);
            }
            Err(reason) => skip(&mut out.report, line, reason),
        }
    }

    out.report.years = years.into_iter().collect();
    if opts.day_basis == DayBasis::YearRelative && out.report.spans_multiple_years() {
        warn!(
            years = ?out.report.years,
            "ledger spans several calendar years but days are year-relative; \
             durations across a year boundary are not meaningful"
        );
    }

    debug!(
        rows_read = out.report.rows_read,
        rows_ok = out.report.rows_ok,
        rows_valuation = out.report.rows_valuation,
        rows_skipped = out.report.rows_skipped,
        instruments = out.ledger.len(),
        "ledger loaded"
    );
    Ok(out)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn skip(report: &mut LoadReport, line: u64, reason: SkipReason) {
    debug!(line, %reason, "row skipped");
    report.rows_skipped += 1;
    report.skipped.push(SkippedRow { line, reason });
}

fn parse_row(
    rec: &csv::StringRecord,
    opts: &LoaderOptions,
    years: &mut BTreeSet<i32>,
) -> Result<Row, SkipReason> {
    if rec.len() < 4 {
        return Err(SkipReason::TooFewFields);
    }
    let (raw_date, instrument, raw_qty, raw_price) = (&rec[0], &rec[1], &rec[2], &rec[3]);

    if instrument.is_empty() {
        return Err(SkipReason::EmptyInstrument);
    }

    let date = parse_date(raw_date, &opts.date_format)
        .ok_or_else(|| SkipReason::BadDate(raw_date.to_string()))?;

    let price: f64 = raw_price
        .parse()
        .map_err(|_| SkipReason::BadPrice(raw_price.to_string()))?;

    if raw_qty.is_empty() {
        if !price.is_finite() || price < 0.0 {
            return Err(SkipReason::BadPrice(raw_price.to_string()));
        }
        return Ok(Row::Valuation {
            instrument: instrument.to_string(),
            price,
        });
    }

    let qty: f64 = raw_qty
        .parse()
        .map_err(|_| SkipReason::BadQuantity(raw_qty.to_string()))?;
    if !qty.is_finite() {
        return Err(SkipReason::BadQuantity(raw_qty.to_string()));
    }
    if qty.abs() <= QUANTITY_EPSILON {
        return Err(SkipReason::ZeroQuantity(raw_qty.to_string()));
    }

    let side = if qty < 0.0 { Side::Sell } else { Side::Buy };
    years.insert(date.year());

    Ok(Row::Trade {
        instrument: instrument.to_string(),
        tx: Transaction::new(resolve_day(date, opts.day_basis), side, qty.abs(), price),
    })
}
