//! Scenario: matching failures are explicit and fail fast per instrument.

use hpd_lots::{
    compute_lots, compute_lots_with, ClosingPrice, MatchError, MatchErrorKind, MatchPolicy,
    Transaction,
};

#[test]
fn oversized_disposal_raises_insufficient_lots() {
    let txs = [
        Transaction::buy(1, 10.0, 1.0),
        Transaction::buy(2, 5.0, 1.0),
        Transaction::sell(3, 20.0, 2.0),
    ];

    let err = compute_lots("ACME", &txs, Some(1.0)).unwrap_err();

    assert_eq!(
        err,
        MatchError::InsufficientLots {
            instrument: "ACME".to_string(),
            day: 3,
            requested: 20.0,
            available: 15.0,
        }
    );
    assert_eq!(err.kind(), MatchErrorKind::InsufficientLots);
    assert_eq!(err.instrument(), "ACME");
    assert!(err.to_string().contains("day 3"));
}

#[test]
fn disposal_without_any_acquisition_fails() {
    let txs = [Transaction::sell(3, 1.0, 2.0)];
    let err = compute_lots("ACME", &txs, None).unwrap_err();
    assert!(matches!(
        err,
        MatchError::InsufficientLots { available, .. } if available == 0.0
    ));
}

#[test]
fn failure_after_earlier_matches_returns_no_lots() {
    // first disposal matches fine, the second overdraws
    let txs = [
        Transaction::buy(1, 10.0, 1.0),
        Transaction::sell(2, 5.0, 2.0),
        Transaction::sell(3, 6.0, 2.0),
    ];

    let res = compute_lots("ACME", &txs, Some(1.0));
    assert!(matches!(res, Err(MatchError::InsufficientLots { day: 3, .. })));
}

#[test]
fn out_of_order_disposal_is_an_ordering_violation() {
    let txs = [
        Transaction::buy(50, 10.0, 1.0),
        Transaction::sell(20, 5.0, 2.0),
    ];

    let err = compute_lots("ACME", &txs, None).unwrap_err();

    assert_eq!(
        err,
        MatchError::OrderingViolation {
            instrument: "ACME".to_string(),
            day_start: 50,
            day_end: 20,
        }
    );
}

#[test]
fn missing_terminal_price_flags_open_lots_unvalued() {
    let txs = [Transaction::buy(10, 7.0, 1.0)];

    let lots = compute_lots("ACME", &txs, None).unwrap();

    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].price_end, ClosingPrice::Unvalued);
    assert!(lots[0].is_unvalued());
    assert_eq!(lots[0].gain(), None);
}

#[test]
fn strict_policy_turns_unvalued_open_position_into_error() {
    let txs = [
        Transaction::buy(10, 7.0, 1.0),
        Transaction::buy(11, 3.0, 1.0),
    ];
    let policy = MatchPolicy::default().strict();

    let err = compute_lots_with("ACME", &txs, None, &policy).unwrap_err();

    assert_eq!(
        err,
        MatchError::UnvaluedOpenPosition {
            instrument: "ACME".to_string(),
            quantity: 10.0,
        }
    );

    // with a price the strict policy is satisfied
    assert!(compute_lots_with("ACME", &txs, Some(2.0), &policy).is_ok());
}

#[test]
fn strict_policy_ignores_fully_closed_instruments() {
    let txs = [
        Transaction::buy(10, 7.0, 1.0),
        Transaction::sell(11, 7.0, 1.0),
    ];
    let policy = MatchPolicy::default().strict();
    assert_eq!(compute_lots_with("ACME", &txs, None, &policy).unwrap().len(), 1);
}
