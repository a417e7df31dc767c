#![allow(dead_code)]

use trp_penalty::core_types::{Fixed, StopId};
use trp_penalty::penalty::{CostMatrix, CostModel, EvaluationParameters};
use trp_penalty::tour::{Stop, Tour, TourBuilder, TourGraph};

/// A depot-split tour together with the plan it was built from.
pub struct Scenario {
    pub tour: Tour,
    pub costs: CostMatrix,
    pub routes: Vec<Vec<StopId>>,
}

impl Scenario {
    pub fn real_count(&self) -> usize {
        self.tour.real_count()
    }
}

/// Builds scenarios route by route. Route `r` gets a depot marker with
/// `depot_id = r + 1`; ids are handed out in plan order, so route 0's marker
/// is the canonical depot `0`.
pub struct ScenarioBuilder {
    stops: Vec<Stop>,
    routes: Vec<Vec<StopId>>,
    weights: Option<Vec<Fixed>>,
    uniform: Fixed,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            routes: Vec::new(),
            weights: None,
            uniform: 10,
        }
    }

    /// Opens a new route at a fresh depot marker.
    pub fn route(mut self) -> Self {
        let id = self.stops.len();
        self.stops.push(Stop::depot(id, self.routes.len() + 1));
        self.routes.push(vec![id]);
        self
    }

    /// Appends a customer to the current route.
    pub fn customer(mut self, service: Fixed, wait: Fixed) -> Self {
        let id = self.stops.len();
        self.stops.push(Stop::customer(id, service, wait));
        self.routes
            .last_mut()
            .expect("call route() before customer()")
            .push(id);
        self
    }

    /// Route sizes in customers, all with zero service and wait.
    pub fn routes(mut self, sizes: &[usize]) -> Self {
        for &size in sizes {
            self = self.route();
            for _ in 0..size {
                self = self.customer(0, 0);
            }
        }
        self
    }

    /// Same off-diagonal distance everywhere.
    pub fn uniform(mut self, w: Fixed) -> Self {
        self.uniform = w;
        self
    }

    /// Row-major distances over the real stops.
    pub fn weights(mut self, weights: Vec<Fixed>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn stops_mut(&mut self) -> &mut Vec<Stop> {
        &mut self.stops
    }

    pub fn build(self) -> Scenario {
        let n = self.stops.len();
        let costs = match self.weights {
            Some(w) => CostMatrix::new(n, w).expect("bad weights"),
            None => CostMatrix::uniform(n, self.uniform),
        };
        let tour = TourBuilder::new(self.stops)
            .build(&self.routes)
            .expect("bad plan");
        Scenario {
            tour,
            costs,
            routes: self.routes,
        }
    }
}

/// Running penalty after one lateness or route-cap term of the reference scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningValue {
    /// Depot marker of the route the term belongs to.
    pub route: StopId,
    pub penalty: f64,
}

/// Straight full scan over the plan, route by route from the depot, recording
/// the running penalty after every term. Edges run from the real stop to the
/// duplicate of the next one, which is how the depot-split tour presents them.
pub fn reference_trace(s: &Scenario, params: &EvaluationParameters) -> Vec<RunningValue> {
    let n = s.real_count();
    let scale = params.scale as f64;
    let mut penalty = 0.0;
    let mut trace = Vec::new();

    for route in &s.routes {
        let mut elapsed = 0.0;
        let mut prev = route[0];
        for &c in &route[1..] {
            let edge = s.costs.distance(prev, c)
                - s.tour.stop(prev).pi
                - s.tour.stop(c + n).pi;
            elapsed += edge as f64 / scale;
            let stop = s.tour.stop(c);
            elapsed += stop.service_time as f64 / scale;
            penalty += (elapsed + stop.wait as f64 / scale).powf(params.exponent);
            trace.push(RunningValue {
                route: route[0],
                penalty,
            });
            if let Some(cap) = params.route_cap {
                if elapsed > cap {
                    penalty += elapsed - cap;
                    trace.push(RunningValue {
                        route: route[0],
                        penalty,
                    });
                }
            }
            prev = c;
        }
    }
    trace
}

pub fn reference_penalty(s: &Scenario, params: &EvaluationParameters) -> f64 {
    reference_trace(s, params).last().map_or(0.0, |v| v.penalty)
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
