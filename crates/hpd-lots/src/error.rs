use serde::Serialize;

/// Coarse classification of [`MatchError`], for callers that group failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchErrorKind {
    InsufficientLots,
    OrderingViolation,
    UnvaluedOpenPosition,
    InvalidTransaction,
}

/// Everything that stops matching for one instrument.
///
/// The matcher fails fast: once an error is raised no lots are returned for
/// that instrument.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchError {
    /// A disposal exceeds the remaining acquired quantity.
    InsufficientLots {
        instrument: String,
        day: i64,
        requested: f64,
        available: f64,
    },
    /// A lot would end before it starts (transactions out of day order).
    OrderingViolation {
        instrument: String,
        day_start: i64,
        day_end: i64,
    },
    /// An open lot exists but no terminal valuation was supplied.
    UnvaluedOpenPosition { instrument: String, quantity: f64 },
    /// Quantity or price outside the accepted domain.
    InvalidTransaction {
        instrument: String,
        index: usize,
        reason: String,
    },
}

impl MatchError {
    pub fn instrument(&self) -> &str {
        match self {
            Self::InsufficientLots { instrument, .. }
            | Self::OrderingViolation { instrument, .. }
            | Self::UnvaluedOpenPosition { instrument, .. }
            | Self::InvalidTransaction { instrument, .. } => instrument,
        }
    }

    pub fn kind(&self) -> MatchErrorKind {
        match self {
            Self::InsufficientLots { .. } => MatchErrorKind::InsufficientLots,
            Self::OrderingViolation { .. } => MatchErrorKind::OrderingViolation,
            Self::UnvaluedOpenPosition { .. } => MatchErrorKind::UnvaluedOpenPosition,
            Self::InvalidTransaction { .. } => MatchErrorKind::InvalidTransaction,
        }
    }
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientLots {
                instrument,
                day,
                requested,
                available,
            } => write!(
                f,
                "{instrument}: disposal of {requested} on day {day} exceeds open quantity {available}"
            ),
            Self::OrderingViolation {
                instrument,
                day_start,
                day_end,
            } => write!(
                f,
                "{instrument}: lot ends on day {day_end} before it starts on day {day_start} \
                 (transactions not in day order)"
            ),
            Self::UnvaluedOpenPosition {
                instrument,
                quantity,
            } => write!(
                f,
                "{instrument}: open quantity {quantity} has no terminal valuation"
            ),
            Self::InvalidTransaction {
                instrument,
                index,
                reason,
            } => write!(f, "{instrument}: transaction #{index} rejected: {reason}"),
        }
    }
}

impl std::error::Error for MatchError {}
