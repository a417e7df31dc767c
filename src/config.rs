use crate::consts::{DEFAULT_COST_EXPONENT, DEFAULT_SCALE, LEGACY_THRESHOLD_DIVISOR};
use crate::error::PtResult;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Fixed-point precision divisor applied to every distance/time quantity.
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    pub scale: i64,

    /// Per-route cap on elapsed distance/time (in unscaled units).
    #[arg(long)]
    pub route_cap: Option<f64>,

    /// Exponent applied to per-stop lateness.
    #[arg(long)]
    pub cost_exponent: Option<f64>,

    /// Legacy packed exponent (exponent * 10). Ignored when `cost_exponent` is set.
    #[arg(long, default_value_t = 0)]
    pub risk_threshold: i64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            route_cap: None,
            cost_exponent: None,
            risk_threshold: 0,
        }
    }
}

impl EvaluatorConfig {
    /// Explicit exponent first, then the legacy threshold, then the default.
    pub fn resolved_exponent(&self) -> f64 {
        if let Some(e) = self.cost_exponent {
            return e;
        }
        if self.risk_threshold != 0 {
            return self.risk_threshold as f64 / LEGACY_THRESHOLD_DIVISOR;
        }
        DEFAULT_COST_EXPONENT
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PtResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn merge_from_cli(&mut self, cli: &EvaluatorConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(scale, "scale");
        update_if_present!(route_cap, "route_cap");
        update_if_present!(cost_exponent, "cost_exponent");
        update_if_present!(risk_threshold, "risk_threshold");
    }
}
