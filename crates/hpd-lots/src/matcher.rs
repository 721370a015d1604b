use tracing::debug;

use crate::error::MatchError;
use crate::stack::{AcquisitionStack, OpenEntry};
use crate::types::{ClosingPrice, Lot, MatchPolicy, Side, Transaction};

/// Quantities within this distance of zero are treated as zero.
///
/// Keeps float dust (e.g. 0.3 - 0.1 - 0.2) from surviving as a tiny open lot
/// or tripping `InsufficientLots` on an exact full disposal. A transaction
/// quantity must exceed it.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Tolerance per unit of magnitude, for quantities large enough that f64
/// spacing exceeds [`QUANTITY_EPSILON`] (from about 1e7 up).
pub const QUANTITY_RELATIVE_EPSILON: f64 = 1e-12;

/// Dust tolerance for arithmetic carried out at magnitude `scale`.
pub fn quantity_tolerance(scale: f64) -> f64 {
    QUANTITY_EPSILON.max(scale.abs() * QUANTITY_RELATIVE_EPSILON)
}

/// Match one instrument's transactions LIFO with the default policy.
///
/// See [`compute_lots_with`].
pub fn compute_lots(
    instrument: &str,
    transactions: &[Transaction],
    terminal_price: Option<f64>,
) -> Result<Vec<Lot>, MatchError> {
    compute_lots_with(
        instrument,
        transactions,
        terminal_price,
        &MatchPolicy::default(),
    )
}

/// Match one instrument's transactions LIFO and emit every lot.
///
/// Rules:
/// - Buy pushes an open entry onto the stack.
/// - Sell consumes the stack top first. A fully consumed entry is popped,
///   a partially consumed one stays with its remainder. Each consumed
///   segment is one lot closed at the sell price.
/// - Entries left at the end become open lots ending at the horizon,
///   oldest first, valued at `terminal_price` (or `Unvalued`).
///
/// Pure: the stack lives only for this call. On error no lots are returned.
pub fn compute_lots_with(
    instrument: &str,
    transactions: &[Transaction],
    terminal_price: Option<f64>,
    policy: &MatchPolicy,
) -> Result<Vec<Lot>, MatchError> {
    let mut stack = AcquisitionStack::new();
    let mut lots = Vec::new();

    for (index, tx) in transactions.iter().enumerate() {
        validate(instrument, index, tx)?;
        match tx.side {
            Side::Buy => stack.push(OpenEntry {
                day: tx.day,
                remaining: tx.quantity,
                price: tx.price,
            }),
            Side::Sell => dispose(instrument, &mut stack, &mut lots, tx)?,
        }
    }

    if !stack.is_empty() && terminal_price.is_none() && policy.require_terminal_valuation {
        return Err(MatchError::UnvaluedOpenPosition {
            instrument: instrument.to_string(),
            quantity: stack.total_remaining(),
        });
    }

    let closing = terminal_price.map_or(ClosingPrice::Unvalued, ClosingPrice::Terminal);
    let horizon = policy.horizon.day();
    for entry in stack.drain_open() {
        lots.push(checked_lot(
            instrument,
            entry.day,
            horizon,
            entry.remaining,
            entry.price,
            closing,
        )?);
    }

    debug!(
        instrument,
        transactions = transactions.len(),
        lots = lots.len(),
        "matched instrument"
    );
    Ok(lots)
}

/// Consume the stack for one disposal.
fn dispose(
    instrument: &str,
    stack: &mut AcquisitionStack,
    lots: &mut Vec<Lot>,
    tx: &Transaction,
) -> Result<(), MatchError> {
    let insufficient = |available: f64| MatchError::InsufficientLots {
        instrument: instrument.to_string(),
        day: tx.day,
        requested: tx.quantity,
        available,
    };

    // Checked up front so a failing disposal never emits a partial lot.
    let available = stack.total_remaining();
    let tolerance = quantity_tolerance(tx.quantity.max(available));
    if stack.is_empty() || tx.quantity > available + tolerance {
        return Err(insufficient(available));
    }

    let mut outstanding = tx.quantity;
    while outstanding > tolerance {
        let top = *stack.peek().ok_or_else(|| insufficient(0.0))?;
        let closing = ClosingPrice::Disposal(tx.price);

        if top.remaining - outstanding <= tolerance {
            lots.push(checked_lot(
                instrument,
                top.day,
                tx.day,
                top.remaining,
                top.price,
                closing,
            )?);
            outstanding -= top.remaining;
            stack.pop();
        } else {
            lots.push(checked_lot(
                instrument,
                top.day,
                tx.day,
                outstanding,
                top.price,
                closing,
            )?);
            if let Some(entry) = stack.peek_mut() {
                entry.remaining -= outstanding;
            }
            outstanding = 0.0;
        }
    }

    Ok(())
}

fn checked_lot(
    instrument: &str,
    day_start: i64,
    day_end: i64,
    quantity: f64,
    price_begin: f64,
    price_end: ClosingPrice,
) -> Result<Lot, MatchError> {
    if day_end < day_start {
        return Err(MatchError::OrderingViolation {
            instrument: instrument.to_string(),
            day_start,
            day_end,
        });
    }
    Ok(Lot::new(
        instrument,
        day_start,
        day_end,
        quantity,
        price_begin,
        price_end,
    ))
}

fn validate(instrument: &str, index: usize, tx: &Transaction) -> Result<(), MatchError> {
    let reason = if tx.day < 0 {
        format!("day must be >= 0, got {}", tx.day)
    } else if !tx.quantity.is_finite() || tx.quantity <= QUANTITY_EPSILON {
        format!("quantity must be > {QUANTITY_EPSILON}, got {}", tx.quantity)
    } else if !tx.price.is_finite() || tx.price < 0.0 {
        format!("price must be >= 0, got {}", tx.price)
    } else {
        return Ok(());
    };
    Err(MatchError::InvalidTransaction {
        instrument: instrument.to_string(),
        index,
        reason,
    })
}
