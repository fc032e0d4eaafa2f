/// Aggregator lifecycle phases
///
/// The aggregator moves strictly forward through these phases; there is no way
/// back to `Collecting` once a stop has been decided.
use std::fmt;

/// Represents where an aggregation call is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for page results or the timeout
    Collecting,

    /// Stop decided; accepted items are being frozen as the call's output
    Stopping,

    /// Discarding results from fetches launched before the stop decision
    Draining,

    /// Terminal; state has been handed back to the caller
    Done,
}

impl Phase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while page results still change the accepted items
    pub fn accepts_results(&self) -> bool {
        matches!(self, Self::Collecting)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Collecting, Self::Stopping)
                | (Self::Stopping, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Stopping => "stopping",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
