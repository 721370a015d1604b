//! Aggregation: run the matcher across the whole ledger.
//!
//! # Canonical lot order
//!
//! `(duration_days desc, instrument asc)`, stable. Lots with an equal key keep
//! the order the matcher emitted them in (ledger order, disposals before
//! open lots), so the same ledger always renders the same report.
//!
//! # Partial failure
//!
//! One instrument failing does not stop the others. Its error is collected
//! in [`LotReport::failures`] and none of its lots are reported.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::error::MatchError;
use crate::ledger::Ledger;
use crate::matcher::compute_lots_with;
use crate::types::{Lot, MatchPolicy, TerminalValuations};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// An instrument whose matching failed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstrumentFailure {
    pub instrument: String,
    pub error: MatchError,
}

/// Per-instrument totals over the reported lots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstrumentSummary {
    pub instrument: String,
    pub lots: usize,
    pub quantity_closed: f64,
    pub quantity_open: f64,
    /// Sum of gains over lots that have a closing price.
    pub gain: f64,
    /// Open quantity with no terminal valuation.
    pub quantity_unvalued: f64,
}

/// Outcome of [`compute_all`]: sorted lots plus per-instrument failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LotReport {
    pub lots: Vec<Lot>,
    /// In ledger order.
    pub failures: Vec<InstrumentFailure>,
}

impl LotReport {
    /// No failed instruments and no unvalued open lots.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unvalued().next().is_none()
    }

    /// Open lots that carry no terminal valuation.
    pub fn unvalued(&self) -> impl Iterator<Item = &Lot> + '_ {
        self.lots.iter().filter(|l| l.is_unvalued())
    }

    /// Sum of gains across every lot with a closing price.
    pub fn total_gain(&self) -> f64 {
        self.lots.iter().filter_map(Lot::gain).sum()
    }

    /// Totals per instrument, ordered by instrument identifier.
    pub fn summaries(&self) -> Vec<InstrumentSummary> {
        let mut by_instrument: BTreeMap<&str, InstrumentSummary> = BTreeMap::new();
        for lot in &self.lots {
            let s = by_instrument
                .entry(lot.instrument.as_str())
                .or_insert_with(|| InstrumentSummary {
                    instrument: lot.instrument.clone(),
                    lots: 0,
                    quantity_closed: 0.0,
                    quantity_open: 0.0,
                    gain: 0.0,
                    quantity_unvalued: 0.0,
                });
            s.lots += 1;
            if lot.is_open() {
                s.quantity_open += lot.quantity;
            } else {
                s.quantity_closed += lot.quantity;
            }
            if lot.is_unvalued() {
                s.quantity_unvalued += lot.quantity;
            }
            s.gain += lot.gain().unwrap_or(0.0);
        }
        by_instrument.into_values().collect()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Match every instrument with the default policy.
pub fn compute_all(ledger: &Ledger, valuations: &TerminalValuations) -> LotReport {
    compute_all_with(ledger, valuations, &MatchPolicy::default())
}

/// Match every instrument, merge the lots and sort them canonically.
pub fn compute_all_with(
    ledger: &Ledger,
    valuations: &TerminalValuations,
    policy: &MatchPolicy,
) -> LotReport {
    let mut report = LotReport::default();

    for (instrument, transactions) in ledger.for_each_instrument() {
        let terminal = valuations.get(instrument).copied();
        match compute_lots_with(instrument, transactions, terminal, policy) {
            Ok(lots) => report.lots.extend(lots),
            Err(error) => {
                warn!(instrument, %error, "instrument skipped");
                report.failures.push(InstrumentFailure {
                    instrument: instrument.to_string(),
                    error,
                });
            }
        }
    }

    sort_lots_canonical(&mut report.lots);
    report
}

/// Sort lots by holding duration descending, then instrument ascending.
///
/// Stable: lots with an equal key keep their relative order.
pub fn sort_lots_canonical(lots: &mut [Lot]) {
    lots.sort_by(|a, b| {
        let duration = b.duration_days.cmp(&a.duration_days);
        if duration != Ordering::Equal {
            return duration;
        }
        a.instrument.cmp(&b.instrument)
    });
}
