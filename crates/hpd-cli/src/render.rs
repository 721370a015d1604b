//! Presentation of a [`LotReport`]: coloured fixed-width table or JSON.
//!
//! Columns: instrument (30), quantity, opening price, closing price,
//! holding days (10 each), right-aligned. Padding is applied before colour
//! so escape codes never skew the alignment.

use std::fmt::Write as _;

use hpd_ingest::LoadReport;
use hpd_lots::{ClosingPrice, InstrumentFailure, InstrumentSummary, Lot, LotReport};
use serde::Serialize;

const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Marker printed in place of a missing terminal valuation.
pub const UNVALUED: &str = "n/a";

fn paint(text: String, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text
    }
}

fn closing_cell(price: &ClosingPrice) -> (String, bool) {
    match price.value() {
        Some(p) => (p.to_string(), false),
        None => (UNVALUED.to_string(), true),
    }
}

/// One line per lot, in report order.
pub fn table(report: &LotReport, color: bool) -> String {
    let mut out = String::new();
    for lot in &report.lots {
        out.push_str(&row(lot, color));
        out.push('\n');
    }
    out
}

fn row(lot: &Lot, color: bool) -> String {
    let (closing, unvalued) = closing_cell(&lot.price_end);
    let closing = format!("{closing:>10}");
    let closing = if unvalued {
        paint(closing, YELLOW, color)
    } else {
        paint(closing, CYAN, color)
    };

    let mut s = String::new();
    s.push_str(&paint(format!("{:>30}", lot.instrument), RED, color));
    s.push_str(&paint(format!("{:>10}", lot.quantity), CYAN, color));
    s.push_str(&paint(format!("{:>10}", lot.price_begin), CYAN, color));
    s.push_str(&closing);
    s.push_str(&paint(format!("{:>10}", lot.duration_days), CYAN, color));
    s
}

/// Failures and unvalued-position warnings, meant for stderr.
pub fn diagnostics(report: &LotReport, color: bool) -> String {
    let mut out = String::new();

    for InstrumentFailure { error, .. } in &report.failures {
        let _ = writeln!(out, "{}", paint(format!("error: {error}"), RED, color));
    }

    let mut unvalued: Vec<&str> = report.unvalued().map(|l| l.instrument.as_str()).collect();
    if !unvalued.is_empty() {
        unvalued.sort_unstable();
        unvalued.dedup();
        let line = format!(
            "warning: open lots without terminal valuation: {}",
            unvalued.join(", ")
        );
        let _ = writeln!(out, "{}", paint(line, YELLOW, color));
    }

    out
}

/// Machine-readable report document.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub config_hash: &'a str,
    pub load: &'a LoadReport,
    pub lots: &'a [Lot],
    pub failures: &'a [InstrumentFailure],
    pub summaries: Vec<InstrumentSummary>,
    pub total_gain: f64,
}

impl<'a> JsonReport<'a> {
    pub fn new(config_hash: &'a str, load: &'a LoadReport, report: &'a LotReport) -> Self {
        Self {
            config_hash,
            load,
            lots: &report.lots,
            failures: &report.failures,
            summaries: report.summaries(),
            total_gain: report.total_gain(),
        }
    }
}
