pub mod generator;

pub use self::generator::{LocationMix, TaskGenerator};

use crate::config::EvaluatorConfig;
use crate::core_types::{Fixed, StopId};
use crate::error::{PenaltyError, PtResult};
use crate::penalty::loader::to_fixed;
use crate::penalty::{CostMatrix, EvaluationParameters};
use crate::tour::{Stop, Tour, TourBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A pending task: where it is, when it was released, and how long it had
/// already been waiting before `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub location: [f64; 2],
    pub time: f64,
    #[serde(default)]
    pub initial_wait: f64,
}

/// Snapshot of a dispatching problem plus the plan to score.
///
/// Settings left out here fall back to the evaluator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrpInstance {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_cap: Option<f64>,
    pub depot: [f64; 2],
    pub simulation_time: f64,
    #[serde(default)]
    pub mean_service_time: f64,
    pub tasks: Vec<TaskSpec>,
    /// Full matrix over depot + tasks, depot first. Euclidean when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<Vec<f64>>>,
    /// Task numbers (1-based) per route. One route in task order when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Vec<usize>>>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

/// Everything the evaluator needs for one instance.
#[derive(Debug, Clone)]
pub struct BuiltInstance {
    pub tour: Tour,
    pub costs: CostMatrix,
    pub params: EvaluationParameters,
}

impl TrpInstance {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PtResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PtResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn route_count(&self) -> usize {
        self.routes.as_ref().map_or(1, |r| r.len())
    }

    /// Instance settings take precedence over `cfg`.
    pub fn parameters(&self, cfg: &EvaluatorConfig) -> PtResult<EvaluationParameters> {
        let mut merged = cfg.clone();
        if let Some(scale) = self.scale {
            merged.scale = scale;
        }
        if self.cost_exponent.is_some() {
            merged.cost_exponent = self.cost_exponent;
        }
        if self.route_cap.is_some() {
            merged.route_cap = self.route_cap;
        }
        EvaluationParameters::try_from(&merged)
    }

    /// Lays the plan out as a depot-split tour with scaled distances.
    ///
    /// Real ids: `0` is the depot, `1..=m` the tasks, and every route after
    /// the first gets an extra depot marker at `m + r` placed on the depot.
    pub fn build(&self, cfg: &EvaluatorConfig) -> PtResult<BuiltInstance> {
        let params = self.parameters(cfg)?;
        let scale = params.scale;
        let m = self.tasks.len();

        let plan = self.plan()?;
        let n = m + plan.len();

        let mut stops = Vec::with_capacity(n);
        stops.push(Stop::depot(0, 1));
        let service = to_fixed(self.mean_service_time, scale);
        for (i, task) in self.tasks.iter().enumerate() {
            let waited = self.simulation_time - task.time + task.initial_wait;
            if waited < 0.0 {
                warn!(
                    "Task {} is released after the simulation time ({} > {})",
                    i + 1,
                    task.time,
                    self.simulation_time
                );
            }
            stops.push(Stop::customer(i + 1, service, to_fixed(waited, scale)));
        }
        for r in 1..plan.len() {
            stops.push(Stop::depot(m + r, r + 1));
        }

        let costs = self.cost_matrix(n, scale)?;

        let routes: Vec<Vec<StopId>> = plan
            .iter()
            .enumerate()
            .map(|(r, tasks)| {
                let marker = if r == 0 { 0 } else { m + r };
                std::iter::once(marker).chain(tasks.iter().copied()).collect()
            })
            .collect();

        let tour = TourBuilder::new(stops).build(&routes)?;
        debug!(
            "Built instance '{}': {} tasks, {} routes, scale {}",
            self.name,
            m,
            routes.len(),
            scale
        );

        Ok(BuiltInstance {
            tour,
            costs,
            params,
        })
    }

    fn plan(&self) -> PtResult<Vec<Vec<usize>>> {
        let m = self.tasks.len();
        let Some(routes) = &self.routes else {
            return Ok(vec![(1..=m).collect()]);
        };
        if routes.is_empty() {
            return Err(PenaltyError::Validation(format!(
                "Instance '{}' lists no routes",
                self.name
            )));
        }
        for (r, route) in routes.iter().enumerate() {
            if let Some(&bad) = route.iter().find(|&&t| t == 0 || t > m) {
                return Err(PenaltyError::Validation(format!(
                    "Route {} references task {}, expected 1..={}",
                    r, bad, m
                )));
            }
        }
        Ok(routes.clone())
    }

    /// Distances over all `n` real stops; extra depot markers copy the depot.
    fn cost_matrix(&self, n: usize, scale: i64) -> PtResult<CostMatrix> {
        let m = self.tasks.len();
        // real id -> row in the depot-first task table
        let source = |id: StopId| if id <= m { id } else { 0 };

        let mut weights: Vec<Fixed> = vec![0; n * n];
        match &self.distances {
            Some(rows) => {
                if rows.len() != m + 1 || rows.iter().any(|r| r.len() != m + 1) {
                    return Err(PenaltyError::Validation(format!(
                        "Distance matrix must be {0}x{0} (depot + {1} tasks)",
                        m + 1,
                        m
                    )));
                }
                for a in 0..n {
                    for b in 0..n {
                        let d = rows[source(a)][source(b)];
                        if !d.is_finite() || d < 0.0 {
                            return Err(PenaltyError::Validation(format!(
                                "Invalid distance {} between {} and {}",
                                d, a, b
                            )));
                        }
                        weights[a * n + b] = to_fixed(d, scale);
                    }
                }
            }
            None => {
                let coords: Vec<[f64; 2]> = (0..n)
                    .map(|id| match source(id) {
                        0 => self.depot,
                        t => self.tasks[t - 1].location,
                    })
                    .map(|[x, y]| [to_fixed(x, scale) as f64, to_fixed(y, scale) as f64])
                    .collect();
                for a in 0..n {
                    for b in 0..n {
                        weights[a * n + b] = euc_2d(coords[a], coords[b]);
                    }
                }
            }
        }
        CostMatrix::new(n, weights)
    }
}

/// Euclidean distance rounded to the nearest integer.
#[inline(always)]
pub fn euc_2d(a: [f64; 2], b: [f64; 2]) -> Fixed {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.hypot(dy).round() as Fixed
}
