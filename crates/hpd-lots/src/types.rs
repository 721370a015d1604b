use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// BUY (acquisition) or SELL (disposal).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// A single ledger transaction for one instrument (the matching atom).
///
/// `day` is an offset on the ledger's day axis (zero-based day-of-year by
/// default, see `hpd-ingest`). quantity is always positive; the side carries
/// direction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub day: i64,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
}

impl Transaction {
    pub fn new(day: i64, side: Side, quantity: f64, price: f64) -> Self {
        Self {
            day,
            side,
            quantity,
            price,
        }
    }

    pub fn buy(day: i64, quantity: f64, price: f64) -> Self {
        Self::new(day, Side::Buy, quantity, price)
    }

    pub fn sell(day: i64, quantity: f64, price: f64) -> Self {
        Self::new(day, Side::Sell, quantity, price)
    }

    pub fn is_acquisition(&self) -> bool {
        self.side == Side::Buy
    }
}

/// Price a lot was closed (or valued) at.
///
/// `Unvalued` marks an open lot for an instrument with no terminal
/// valuation. It is never silently priced at zero.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "price", rename_all = "snake_case")]
pub enum ClosingPrice {
    /// Matched against a disposal at this price.
    Disposal(f64),
    /// Still open, valued at the terminal price.
    Terminal(f64),
    /// Still open, no terminal price known.
    Unvalued,
}

impl ClosingPrice {
    pub fn value(&self) -> Option<f64> {
        match self {
            ClosingPrice::Disposal(p) | ClosingPrice::Terminal(p) => Some(*p),
            ClosingPrice::Unvalued => None,
        }
    }
}

/// A matched disposal segment or a still-open segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub instrument: String,
    pub day_start: i64,
    pub day_end: i64,
    /// Always `day_end - day_start`.
    pub duration_days: i64,
    pub quantity: f64,
    pub price_begin: f64,
    pub price_end: ClosingPrice,
}

impl Lot {
    pub(crate) fn new<S: Into<String>>(
        instrument: S,
        day_start: i64,
        day_end: i64,
        quantity: f64,
        price_begin: f64,
        price_end: ClosingPrice,
    ) -> Self {
        debug_assert!(quantity > 0.0, "Lot.quantity must be > 0");
        Self {
            instrument: instrument.into(),
            day_start,
            day_end,
            duration_days: day_end - day_start,
            quantity,
            price_begin,
            price_end,
        }
    }

    /// True for lots still held at the end of the matching period.
    pub fn is_open(&self) -> bool {
        !matches!(self.price_end, ClosingPrice::Disposal(_))
    }

    pub fn is_unvalued(&self) -> bool {
        self.price_end == ClosingPrice::Unvalued
    }

    /// Gain (positive) or loss (negative): `(price_end - price_begin) * quantity`.
    pub fn gain(&self) -> Option<f64> {
        self.price_end
            .value()
            .map(|end| (end - self.price_begin) * self.quantity)
    }
}

/// Terminal day value used as `day_end` for open lots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Horizon(pub i64);

impl Horizon {
    /// End of a year-relative matching period.
    pub const YEAR_END: Horizon = Horizon(365);

    pub fn day(&self) -> i64 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::YEAR_END
    }
}

/// Knobs for one matching run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MatchPolicy {
    pub horizon: Horizon,
    /// Fail an instrument with `UnvaluedOpenPosition` instead of emitting
    /// `ClosingPrice::Unvalued` lots.
    pub require_terminal_valuation: bool,
}

impl MatchPolicy {
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn strict(mut self) -> Self {
        self.require_terminal_valuation = true;
        self
    }
}

/// Canonical terminal valuation map type (instrument -> price).
pub type TerminalValuations = BTreeMap<String, f64>;
