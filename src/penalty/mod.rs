pub mod costs;
mod engine;
pub mod loader;
pub mod params;
pub mod types;

pub use self::costs::{CostMatrix, CostModel};
pub use self::params::{EvaluationParameters, SearchBound};
pub use self::types::{Checkpoint, CheckpointKind, PenaltyBreakdown, RouteSummary, Verdict};

use self::engine::{scan, ScanEvent, ScanOutcome};
use crate::core_types::StopId;
use crate::error::PtResult;
use crate::tour::{Orientation, TourGraph};
use std::ops::ControlFlow;
use tracing::debug;

/// Lateness/route-cap penalty with early abandonment.
///
/// The only state kept between calls is the route the last scan stopped in
/// (or started from, when it ran to completion). The next scan begins there,
/// which tends to reach a violating route sooner across consecutive moves.
#[derive(Debug, Clone, Default)]
pub struct PenaltyEvaluator {
    start_route: Option<StopId>,
}

impl PenaltyEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume_point(&self) -> Option<StopId> {
        self.start_route
    }

    pub fn reset(&mut self) {
        self.start_route = None;
    }

    /// Computes the penalty of `tour`, or stops as soon as the running value
    /// reaches `bound` and returns `bound.penalty + 1`.
    ///
    /// # Errors
    /// Returns a fatal error when a virtual stop has no real mirror or when the
    /// accumulator stops increasing (overflow/NaN). The resume point is left
    /// untouched in that case.
    pub fn evaluate<G, C>(
        &mut self,
        tour: &G,
        costs: &C,
        params: &EvaluationParameters,
        bound: SearchBound,
    ) -> PtResult<Verdict>
    where
        G: TourGraph + ?Sized,
        C: CostModel + ?Sized,
    {
        let orientation = Orientation::detect(tour);
        let start = self.begin(tour);

        let outcome = scan(tour, costs, params, start, orientation, |event| match event {
            ScanEvent::Checkpoint(cp) if bound.is_reached_by(cp.penalty) => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        })?;

        match outcome {
            ScanOutcome::Stopped { route } => {
                self.start_route = Some(route);
                Ok(Verdict::Abandoned {
                    sentinel: bound.sentinel(),
                    route,
                })
            }
            ScanOutcome::Finished(penalty) => {
                self.start_route = Some(start);
                Ok(Verdict::Complete(penalty))
            }
        }
    }

    /// Full scan from the canonical depot with per-route totals and the
    /// running penalty at every checkpoint. Does not move the resume point.
    pub fn breakdown<G, C>(
        &self,
        tour: &G,
        costs: &C,
        params: &EvaluationParameters,
    ) -> PtResult<PenaltyBreakdown>
    where
        G: TourGraph + ?Sized,
        C: CostModel + ?Sized,
    {
        let orientation = Orientation::detect(tour);
        let mut routes: Vec<RouteSummary> = Vec::new();
        let mut trace = Vec::new();

        let outcome = scan(tour, costs, params, tour.depot(), orientation, |event| {
            match event {
                ScanEvent::RouteStart(s) => {
                    // Duplicate depot markers open zero-length pseudo-routes.
                    if tour.is_real(*s) {
                        routes.push(RouteSummary {
                            start: *s,
                            ..RouteSummary::default()
                        });
                    }
                }
                ScanEvent::Checkpoint(cp) => {
                    if routes.last().map(|r| r.start) != Some(cp.route) {
                        routes.push(RouteSummary {
                            start: cp.route,
                            ..RouteSummary::default()
                        });
                    }
                    if let Some(r) = routes.last_mut() {
                        match cp.kind {
                            CheckpointKind::Lateness => {
                                r.legs += 1;
                                r.elapsed = cp.elapsed;
                                r.lateness += cp.contribution;
                            }
                            CheckpointKind::RouteCap => r.cap_excess += cp.contribution,
                        }
                    }
                    trace.push(*cp);
                }
            }
            ControlFlow::Continue(())
        })?;

        let total = match outcome {
            ScanOutcome::Finished(p) => p,
            ScanOutcome::Stopped { .. } => unreachable!("breakdown never stops early"),
        };

        Ok(PenaltyBreakdown {
            total,
            orientation,
            routes,
            trace,
        })
    }

    /// Where the next scan starts: the stored route folded back to the real id
    /// range, or the depot when nothing usable is stored.
    fn begin<G: TourGraph + ?Sized>(&self, tour: &G) -> StopId {
        let depot = tour.depot();
        let n = tour.real_count();

        let mut start = self.start_route.unwrap_or(depot);
        if start >= n {
            start -= n;
        }
        if start >= n || !tour.is_depot_marker(start) {
            debug!(
                "Resume point {:?} is not a depot marker of this tour; restarting at depot {}",
                self.start_route, depot
            );
            return depot;
        }
        start
    }
}
