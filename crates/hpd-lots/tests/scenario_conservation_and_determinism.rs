//! Scenario: quantity conservation, idempotence and horizon handling.
//!
//! # Invariants under test
//!
//! 1. Σ lot quantity (matched + open) == Σ acquisition quantity.
//! 2. Re-running the matcher on the same input yields the same lots.
//! 3. Open lots end at the configured horizon.

use hpd_lots::{compute_lots, compute_lots_with, Horizon, MatchPolicy, Side, Transaction};

fn busy_ledger() -> Vec<Transaction> {
    vec![
        Transaction::buy(3, 12.5, 10.0),
        Transaction::buy(8, 4.0, 10.5),
        Transaction::sell(15, 6.0, 11.0),
        Transaction::buy(20, 30.0, 9.0),
        Transaction::sell(30, 31.5, 12.0),
        Transaction::buy(31, 2.25, 12.0),
        Transaction::sell(60, 1.0, 13.0),
        Transaction::sell(90, 5.0, 14.0),
    ]
}

fn acquired(txs: &[Transaction]) -> f64 {
    txs.iter()
        .filter(|t| t.side == Side::Buy)
        .map(|t| t.quantity)
        .sum()
}

#[test]
fn lot_quantities_conserve_acquired_quantity() {
    let txs = busy_ledger();
    let lots = compute_lots("ACME", &txs, Some(15.0)).unwrap();

    let total: f64 = lots.iter().map(|l| l.quantity).sum();
    assert!((total - acquired(&txs)).abs() < 1e-9);

    let disposed: f64 = txs
        .iter()
        .filter(|t| t.side == Side::Sell)
        .map(|t| t.quantity)
        .sum();
    let closed: f64 = lots.iter().filter(|l| !l.is_open()).map(|l| l.quantity).sum();
    assert!((closed - disposed).abs() < 1e-9);

    assert!(lots.iter().all(|l| l.quantity > 0.0));
    assert!(lots.iter().all(|l| l.duration_days == l.day_end - l.day_start));
}

#[test]
fn matcher_is_idempotent() {
    let txs = busy_ledger();
    let a = compute_lots("ACME", &txs, Some(15.0)).unwrap();
    let b = compute_lots("ACME", &txs, Some(15.0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn open_lots_end_at_custom_horizon() {
    let txs = [Transaction::buy(100, 1.0, 1.0)];
    let policy = MatchPolicy::default().with_horizon(Horizon(200));

    let lots = compute_lots_with("ACME", &txs, Some(2.0), &policy).unwrap();

    assert_eq!(lots[0].day_end, 200);
    assert_eq!(lots[0].duration_days, 100);
    assert_eq!(lots[0].gain(), Some(1.0));
}

#[test]
fn default_horizon_is_year_end() {
    assert_eq!(Horizon::default(), Horizon::YEAR_END);
    assert_eq!(Horizon::default().day(), 365);
}
