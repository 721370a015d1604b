//! hpd-lots
//!
//! Holding-period lot matching.
//! - Per-instrument append-only ledger
//! - LIFO matching of disposals against prior acquisitions
//! - Open lots valued at a terminal price (or flagged unvalued)
//! - Whole-ledger aggregation with partial-failure reporting
//! - Pure deterministic logic (no IO, no clock)

mod error;
mod stack;
mod types;

pub mod aggregate;
pub mod ledger;
pub mod matcher;

pub use aggregate::{
    compute_all, compute_all_with, sort_lots_canonical, InstrumentFailure, InstrumentSummary,
    LotReport,
};
pub use error::{MatchError, MatchErrorKind};
pub use ledger::Ledger;
pub use matcher::{
    compute_lots, compute_lots_with, quantity_tolerance, QUANTITY_EPSILON, QUANTITY_RELATIVE_EPSILON,
};
pub use stack::{AcquisitionStack, OpenEntry};
pub use types::{
    ClosingPrice, Horizon, Lot, MatchPolicy, Side, TerminalValuations, Transaction,
};

/// Helper to build a TerminalValuations map with minimal boilerplate.
pub fn valuations<I, S>(items: I) -> TerminalValuations
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut m = TerminalValuations::new();
    for (instrument, price) in items {
        m.insert(instrument.into(), price);
    }
    m
}
