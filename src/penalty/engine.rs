use super::costs::CostModel;
use super::params::EvaluationParameters;
use super::types::{Checkpoint, CheckpointKind};
use crate::core_types::{Penalty, StopId};
use crate::error::{PenaltyError, PtResult};
use crate::tour::{Orientation, RouteWalk, Step, Stop, TourGraph};
use std::ops::ControlFlow;
use tracing::error;

pub(crate) enum ScanEvent {
    RouteStart(StopId),
    Checkpoint(Checkpoint),
}

pub(crate) enum ScanOutcome {
    Finished(Penalty),
    Stopped { route: StopId },
}

/// Walks every route once from `start`, feeding each route start and
/// checkpoint to `visit`. A `Break` from `visit` stops the scan.
#[inline]
pub(crate) fn scan<G, C, F>(
    tour: &G,
    costs: &C,
    params: &EvaluationParameters,
    start: StopId,
    orientation: Orientation,
    mut visit: F,
) -> PtResult<ScanOutcome>
where
    G: TourGraph + ?Sized,
    C: CostModel + ?Sized,
    F: FnMut(&ScanEvent) -> ControlFlow<()>,
{
    let scale = params.scale as f64;
    let exponent = params.exponent;

    let mut penalty: Penalty = 0.0;
    let mut elapsed = 0.0;
    let mut route = start;

    for step in RouteWalk::new(tour, start, orientation) {
        match step {
            Step::Route(s) => {
                route = s;
                elapsed = 0.0;
                if visit(&ScanEvent::RouteStart(s)).is_break() {
                    return Ok(ScanOutcome::Stopped { route });
                }
            }
            Step::Leg { from, to } => {
                let edge = costs.distance(from, to)
                    - costs.potential(tour.stop(from))
                    - costs.potential(tour.stop(to));
                elapsed += edge as f64 / scale;

                let target = resolve(tour, to)?;
                elapsed += target.service_time as f64 / scale;

                let lateness = (elapsed + target.wait as f64 / scale).powf(exponent);
                penalty = accumulate(penalty, lateness, exponent)?;
                let cp = Checkpoint {
                    route,
                    stop: target.id,
                    kind: CheckpointKind::Lateness,
                    elapsed,
                    contribution: lateness,
                    penalty,
                };
                if visit(&ScanEvent::Checkpoint(cp)).is_break() {
                    return Ok(ScanOutcome::Stopped { route });
                }

                if let Some(cap) = params.route_cap {
                    if elapsed > cap {
                        let excess = elapsed - cap;
                        penalty = accumulate(penalty, excess, exponent)?;
                        let cp = Checkpoint {
                            kind: CheckpointKind::RouteCap,
                            contribution: excess,
                            penalty,
                            ..cp
                        };
                        if visit(&ScanEvent::Checkpoint(cp)).is_break() {
                            return Ok(ScanOutcome::Stopped { route });
                        }
                    }
                }
            }
        }
    }

    Ok(ScanOutcome::Finished(penalty))
}

/// Attributes of `id`, taken from its mirror when `id` is a virtual duplicate.
#[inline(always)]
fn resolve<G: TourGraph + ?Sized>(tour: &G, id: StopId) -> PtResult<&Stop> {
    if tour.is_real(id) {
        return Ok(tour.stop(id));
    }
    match tour.stop(id).mirror {
        Some(m) if tour.is_real(m) => Ok(tour.stop(m)),
        Some(m) => {
            error!("Virtual stop {} mirrors non-real stop {}", id, m);
            Err(PenaltyError::MirrorNotReal { stop: id, mirror: m })
        }
        None => {
            error!("Virtual stop {} has no mirror", id);
            Err(PenaltyError::MissingMirror { stop: id })
        }
    }
}

/// Adds `term`, refusing any step that does not move the accumulator forward
/// to a finite value.
#[inline(always)]
fn accumulate(previous: Penalty, term: f64, exponent: f64) -> PtResult<Penalty> {
    let current = previous + term;
    if current >= previous && current.is_finite() {
        return Ok(current);
    }
    error!(
        "Wrapped penalty: {}, previous: {}, exponent: {}",
        current, previous, exponent
    );
    Err(PenaltyError::AccumulatorRegression {
        previous,
        current,
        exponent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_rejects_nan() {
        let err = accumulate(3.0, f64::NAN, 1.5).unwrap_err();
        assert!(matches!(
            err,
            PenaltyError::AccumulatorRegression { previous, .. } if previous == 3.0
        ));
    }

    #[test]
    fn test_accumulate_rejects_decrease() {
        assert!(accumulate(3.0, -1.0, 1.5).is_err());
        assert_eq!(accumulate(3.0, 0.0, 1.5).unwrap(), 3.0);
    }

    #[test]
    fn test_accumulate_rejects_overflow() {
        assert!(accumulate(f64::MAX, f64::MAX, 1.5).is_err());
    }
}
