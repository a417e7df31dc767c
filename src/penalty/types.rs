use super::params::SearchBound;
use crate::core_types::{Penalty, StopId};
use crate::tour::Orientation;
use serde::Serialize;
use strum_macros::Display;

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Every route was scanned; this is the true penalty.
    Complete(Penalty),
    /// The scan proved the move no better than the bound and stopped in `route`.
    Abandoned { sentinel: Penalty, route: StopId },
}

impl Verdict {
    /// The scalar handed back to the search driver.
    #[inline(always)]
    pub fn value(&self) -> Penalty {
        match *self {
            Verdict::Complete(p) => p,
            Verdict::Abandoned { sentinel, .. } => sentinel,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, Verdict::Abandoned { .. })
    }

    /// Acceptance rule applied by the caller against its own bound.
    #[inline(always)]
    pub fn rejects(&self, bound: &SearchBound) -> bool {
        bound.is_reached_by(self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    /// Lateness term `(elapsed + wait)^exponent` of a visited stop.
    Lateness,
    /// Excess of elapsed over the route cap.
    RouteCap,
}

/// Running state at one early-exit check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    pub route: StopId,
    /// Real stop that was visited (duplicates resolved to their mirror).
    pub stop: StopId,
    pub kind: CheckpointKind,
    pub elapsed: f64,
    pub contribution: Penalty,
    pub penalty: Penalty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Depot marker the route starts at.
    pub start: StopId,
    pub legs: usize,
    /// Elapsed at the last visited stop.
    pub elapsed: f64,
    pub lateness: Penalty,
    pub cap_excess: Penalty,
}

impl RouteSummary {
    pub fn total(&self) -> Penalty {
        self.lateness + self.cap_excess
    }
}

/// Result of a full scan without early exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyBreakdown {
    pub total: Penalty,
    pub orientation: Orientation,
    pub routes: Vec<RouteSummary>,
    pub trace: Vec<Checkpoint>,
}

impl PenaltyBreakdown {
    /// Index of the first checkpoint at which `bound` is reached, if any.
    pub fn first_exit(&self, bound: &SearchBound) -> Option<usize> {
        self.trace.iter().position(|c| bound.is_reached_by(c.penalty))
    }
}
