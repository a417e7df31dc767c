use crate::core_types::{Penalty, StopId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenaltyError {
    #[error("Mirror Violation: virtual stop {stop} mirrors {mirror}, which is not a real stop")]
    MirrorNotReal { stop: StopId, mirror: StopId },

    #[error("Mirror Violation: virtual stop {stop} has no mirror reference")]
    MissingMirror { stop: StopId },

    #[error(
        "Accumulator Regression: penalty went from {previous} to {current} (exponent {exponent})"
    )]
    AccumulatorRegression {
        previous: Penalty,
        current: Penalty,
        exponent: f64,
    },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

impl PenaltyError {
    /// True for the internal-consistency failures that must end the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MirrorNotReal { .. }
                | Self::MissingMirror { .. }
                | Self::AccumulatorRegression { .. }
        )
    }
}

pub type PtResult<T> = Result<T, PenaltyError>;
