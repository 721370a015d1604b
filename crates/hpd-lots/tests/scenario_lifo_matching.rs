//! Scenario: LIFO matching of disposals against acquisitions.
//!
//! # Invariants under test
//!
//! 1. The most recent still-open acquisition is consumed first.
//! 2. One disposal may consume several acquisitions.
//! 3. One acquisition may be split across several disposals.
//! 4. Leftover quantity becomes exactly one open lot per stack entry.
//!
//! All tests are pure; no IO.

use hpd_lots::{compute_lots, ClosingPrice, Lot, Transaction};

fn closed(lot: &Lot) -> (i64, i64, f64, f64, Option<f64>) {
    (
        lot.day_start,
        lot.day_end,
        lot.quantity,
        lot.price_begin,
        lot.price_end.value(),
    )
}

#[test]
fn disposal_matches_most_recent_acquisition_first() {
    let txs = [
        Transaction::buy(10, 100.0, 1.0),
        Transaction::buy(50, 50.0, 2.0),
        Transaction::sell(100, 30.0, 3.0),
    ];

    let lots = compute_lots("ACME", &txs, Some(4.0)).unwrap();

    // matched lot first, then the open remainder oldest first
    assert_eq!(lots.len(), 3);
    assert_eq!(closed(&lots[0]), (50, 100, 30.0, 2.0, Some(3.0)));
    assert_eq!(lots[0].duration_days, 50);
    assert_eq!(lots[0].price_end, ClosingPrice::Disposal(3.0));

    // A1 untouched, A2 left with 20
    assert_eq!(closed(&lots[1]), (10, 365, 100.0, 1.0, Some(4.0)));
    assert_eq!(closed(&lots[2]), (50, 365, 20.0, 2.0, Some(4.0)));
    assert!(lots[1].is_open() && lots[2].is_open());
}

#[test]
fn disposal_splits_across_acquisitions() {
    let txs = [
        Transaction::buy(10, 20.0, 1.0),
        Transaction::buy(20, 20.0, 1.5),
        Transaction::sell(40, 30.0, 2.0),
    ];

    let lots = compute_lots("ACME", &txs, Some(2.5)).unwrap();

    assert_eq!(lots.len(), 3);
    // A2 fully consumed
    assert_eq!(closed(&lots[0]), (20, 40, 20.0, 1.5, Some(2.0)));
    // then A1 partially
    assert_eq!(closed(&lots[1]), (10, 40, 10.0, 1.0, Some(2.0)));
    // A1 remainder stays open
    assert_eq!(closed(&lots[2]), (10, 365, 10.0, 1.0, Some(2.5)));
}

#[test]
fn acquisition_splits_across_disposals() {
    let txs = [
        Transaction::buy(5, 50.0, 10.0),
        Transaction::sell(10, 20.0, 11.0),
        Transaction::sell(20, 20.0, 12.0),
    ];

    let lots = compute_lots("ACME", &txs, Some(13.0)).unwrap();

    assert_eq!(lots.len(), 3);
    assert_eq!(closed(&lots[0]), (5, 10, 20.0, 10.0, Some(11.0)));
    assert_eq!(closed(&lots[1]), (5, 20, 20.0, 10.0, Some(12.0)));
    assert_eq!(closed(&lots[2]), (5, 365, 10.0, 10.0, Some(13.0)));
}

#[test]
fn exact_disposal_pops_entry_and_reaches_next_acquisition() {
    let txs = [
        Transaction::buy(1, 10.0, 1.0),
        Transaction::buy(2, 10.0, 2.0),
        Transaction::sell(3, 10.0, 3.0),
        Transaction::sell(4, 5.0, 4.0),
    ];

    let lots = compute_lots("ACME", &txs, Some(5.0)).unwrap();

    assert_eq!(closed(&lots[0]), (2, 3, 10.0, 2.0, Some(3.0)));
    assert_eq!(closed(&lots[1]), (1, 4, 5.0, 1.0, Some(4.0)));
    assert_eq!(closed(&lots[2]), (1, 365, 5.0, 1.0, Some(5.0)));
    assert_eq!(lots.len(), 3);
}

#[test]
fn later_acquisition_is_consumed_before_older_remainder() {
    // buy, partial sell, buy again, sell: the second buy goes first
    let txs = [
        Transaction::buy(1, 10.0, 1.0),
        Transaction::sell(2, 4.0, 2.0),
        Transaction::buy(3, 10.0, 3.0),
        Transaction::sell(4, 12.0, 4.0),
    ];

    let lots = compute_lots("ACME", &txs, None).unwrap();

    assert_eq!(closed(&lots[0]), (1, 2, 4.0, 1.0, Some(2.0)));
    assert_eq!(closed(&lots[1]), (3, 4, 10.0, 3.0, Some(4.0)));
    assert_eq!(closed(&lots[2]), (1, 4, 2.0, 1.0, Some(4.0)));
    assert_eq!(closed(&lots[3]), (1, 365, 4.0, 1.0, None));
    assert_eq!(lots.len(), 4);
}

#[test]
fn fully_disposed_instrument_has_no_open_lots() {
    let txs = [
        Transaction::buy(1, 10.0, 1.0),
        Transaction::sell(9, 10.0, 0.5),
    ];

    let lots = compute_lots("ACME", &txs, None).unwrap();

    assert_eq!(lots.len(), 1);
    assert!(!lots[0].is_open());
    assert_eq!(lots[0].gain(), Some(-5.0));
}

#[test]
fn same_day_round_trip_has_zero_duration() {
    let txs = [
        Transaction::buy(42, 3.0, 1.0),
        Transaction::sell(42, 3.0, 1.0),
    ];

    let lots = compute_lots("ACME", &txs, None).unwrap();
    assert_eq!(lots[0].duration_days, 0);
}

#[test]
fn empty_sequence_yields_no_lots() {
    assert!(compute_lots("ACME", &[], Some(1.0)).unwrap().is_empty());
}
