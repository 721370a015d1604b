//! Ledger: per-instrument transaction sequences, append-only.
//!
//! The ledger performs no validation; the matcher owns that boundary.
//!
//! # Determinism
//! Instruments are iterated in first-seen order and every instrument's
//! transactions keep their push order. Two ledgers fed the same sequence of
//! pushes always iterate identically.

use std::collections::HashMap;

use crate::types::Transaction;

/// Append-only mapping: instrument -> ordered transactions.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    index: HashMap<String, usize>,
    books: Vec<(String, Vec<Transaction>)>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Append `tx` to `instrument`'s sequence, creating it on first use.
    pub fn push(&mut self, instrument: impl Into<String>, tx: Transaction) {
        let instrument = instrument.into();
        match self.index.get(&instrument) {
            Some(&slot) => self.books[slot].1.push(tx),
            None => {
                self.index.insert(instrument.clone(), self.books.len());
                self.books.push((instrument, vec![tx]));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    /// `(instrument, transactions)` pairs in first-seen order.
    pub fn for_each_instrument(&self) -> impl Iterator<Item = (&str, &[Transaction])> + '_ {
        self.books
            .iter()
            .map(|(name, txs)| (name.as_str(), txs.as_slice()))
    }

    /// Instrument identifiers in first-seen order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> + '_ {
        self.books.iter().map(|(name, _)| name.as_str())
    }

    pub fn transactions(&self, instrument: &str) -> Option<&[Transaction]> {
        self.index
            .get(instrument)
            .map(|&slot| self.books[slot].1.as_slice())
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Total number of transactions across all instruments.
    pub fn transaction_count(&self) -> usize {
        self.books.iter().map(|(_, txs)| txs.len()).sum()
    }
}
