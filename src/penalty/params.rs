use crate::config::EvaluatorConfig;
use crate::consts::{DEFAULT_COST_EXPONENT, DEFAULT_SCALE, LEGACY_THRESHOLD_DIVISOR};
use crate::core_types::{Gain, Penalty};
use crate::error::{PenaltyError, PtResult};

/// Scaling and limit parameters supplied by the surrounding solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationParameters {
    /// Fixed-point precision divisor.
    pub scale: i64,
    /// Per-route cap on elapsed distance/time; `None` means uncapped.
    pub route_cap: Option<f64>,
    pub exponent: f64,
}

impl Default for EvaluationParameters {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            route_cap: None,
            exponent: DEFAULT_COST_EXPONENT,
        }
    }
}

impl EvaluationParameters {
    pub fn new(scale: i64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn with_route_cap(mut self, cap: f64) -> Self {
        self.route_cap = Some(cap);
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Applies the packed `exponent * 10` integer; zero keeps the current exponent.
    pub fn with_legacy_threshold(mut self, threshold: i64) -> Self {
        if threshold != 0 {
            self.exponent = threshold as f64 / LEGACY_THRESHOLD_DIVISOR;
        }
        self
    }

    pub fn validate(&self) -> PtResult<()> {
        if self.scale <= 0 {
            return Err(PenaltyError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.exponent.is_finite() || self.exponent <= 0.0 {
            return Err(PenaltyError::Config(format!(
                "cost exponent must be positive and finite, got {}",
                self.exponent
            )));
        }
        if let Some(cap) = self.route_cap {
            if cap.is_nan() || cap < 0.0 {
                return Err(PenaltyError::Config(format!(
                    "route cap must be non-negative, got {}",
                    cap
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<&EvaluatorConfig> for EvaluationParameters {
    type Error = PenaltyError;

    fn try_from(cfg: &EvaluatorConfig) -> PtResult<Self> {
        let params = Self {
            scale: cfg.scale,
            route_cap: cfg.route_cap,
            exponent: cfg.resolved_exponent(),
        };
        params.validate()?;
        Ok(params)
    }
}

/// The caller's best-known penalty and the gain of the move under evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBound {
    pub penalty: Penalty,
    pub gain: Gain,
}

impl SearchBound {
    pub fn new(penalty: Penalty, gain: Gain) -> Self {
        Self { penalty, gain }
    }

    /// A bound no finite penalty can reach.
    pub fn unbounded() -> Self {
        Self {
            penalty: Penalty::INFINITY,
            gain: 1,
        }
    }

    /// The move is already at least as bad as the bound.
    #[inline(always)]
    pub fn is_reached_by(&self, penalty: Penalty) -> bool {
        penalty > self.penalty || (penalty == self.penalty && self.gain <= 0)
    }

    /// Returned on early exit: `penalty + 1`, or the next representable value
    /// above `penalty` once the `+ 1` no longer changes it.
    #[inline(always)]
    pub fn sentinel(&self) -> Penalty {
        let up = self.penalty + 1.0;
        if up > self.penalty {
            up
        } else {
            next_above(self.penalty)
        }
    }
}

/// Smallest `f64` strictly greater than a finite `x`.
fn next_above(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        // large negative values step towards zero
        f64::from_bits(bits - 1)
    }
}
