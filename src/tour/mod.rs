pub mod builder;
pub mod walk;

pub use self::builder::TourBuilder;
pub use self::walk::{Orientation, RouteWalk, Step};

use crate::consts::NOT_A_DEPOT;
use crate::core_types::{Fixed, StopId};
use crate::error::{PenaltyError, PtResult};

/// A tour node. All quantities are scaled fixed-point values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    /// `0` for ordinary stops, nonzero for depot-boundary markers.
    pub depot_id: usize,
    /// Dual potential from the relaxation.
    pub pi: Fixed,
    pub service_time: Fixed,
    /// Wait already accumulated before the tour starts (carried in the demand slot).
    pub wait: Fixed,
    /// Real stop mirrored by a virtual duplicate.
    pub mirror: Option<StopId>,
}

impl Stop {
    pub fn customer(id: StopId, service_time: Fixed, wait: Fixed) -> Self {
        Self {
            id,
            depot_id: NOT_A_DEPOT,
            pi: 0,
            service_time,
            wait,
            mirror: None,
        }
    }

    pub fn depot(id: StopId, depot_id: usize) -> Self {
        debug_assert!(depot_id != NOT_A_DEPOT);
        Self {
            id,
            depot_id,
            pi: 0,
            service_time: 0,
            wait: 0,
            mirror: None,
        }
    }

    #[inline(always)]
    pub fn is_depot_marker(&self) -> bool {
        self.depot_id != NOT_A_DEPOT
    }
}

/// Read-only view of the circular tour the evaluator walks.
///
/// Implementors guarantee that successor/predecessor links form a single cycle
/// over `0..len()` and are not mutated while an evaluation is running.
pub trait TourGraph {
    /// The canonical (real) depot.
    fn depot(&self) -> StopId;

    /// Size of the real id range; also the offset between a stop and its duplicate.
    fn real_count(&self) -> usize;

    fn len(&self) -> usize;

    fn succ(&self, id: StopId) -> StopId;

    fn pred(&self, id: StopId) -> StopId;

    fn stop(&self, id: StopId) -> &Stop;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    fn is_real(&self, id: StopId) -> bool {
        id < self.real_count()
    }

    #[inline(always)]
    fn is_depot_marker(&self, id: StopId) -> bool {
        self.stop(id).is_depot_marker()
    }
}

/// Arena-backed tour. Links are stored as index vectors.
#[derive(Debug, Clone)]
pub struct Tour {
    stops: Vec<Stop>,
    succ: Vec<StopId>,
    pred: Vec<StopId>,
    real_count: usize,
    depot: StopId,
}

impl Tour {
    /// Links `order` into a cycle. `order` must be a permutation of all stop ids.
    pub fn from_sequence(
        stops: Vec<Stop>,
        real_count: usize,
        depot: StopId,
        order: &[StopId],
    ) -> PtResult<Self> {
        let len = stops.len();
        if order.len() != len {
            return Err(PenaltyError::Validation(format!(
                "Tour order has {} entries but there are {} stops",
                order.len(),
                len
            )));
        }

        let mut placed = vec![false; len];
        for &id in order {
            if id >= len {
                return Err(PenaltyError::Validation(format!(
                    "Stop {} is outside the arena (len {})",
                    id, len
                )));
            }
            if placed[id] {
                return Err(PenaltyError::Validation(format!(
                    "Stop {} appears twice in the tour order",
                    id
                )));
            }
            placed[id] = true;
        }

        let mut succ = vec![usize::MAX; len];
        let mut pred = vec![usize::MAX; len];
        for (pos, &id) in order.iter().enumerate() {
            let next = order[(pos + 1) % len];
            succ[id] = next;
            pred[next] = id;
        }

        let tour = Self {
            stops,
            succ,
            pred,
            real_count,
            depot,
        };
        tour.validate()?;
        Ok(tour)
    }

    /// Checks the arena invariants: id/index agreement, a single consistent
    /// cycle, a real depot marker, and real mirrors for every duplicate.
    pub fn validate(&self) -> PtResult<()> {
        let len = self.stops.len();
        if len == 0 {
            return Err(PenaltyError::Validation("Tour has 0 stops".to_string()));
        }
        if self.depot >= self.real_count || self.real_count > len {
            return Err(PenaltyError::Validation(format!(
                "Depot {} must be a real stop (real range 0..{})",
                self.depot, self.real_count
            )));
        }
        if !self.stops[self.depot].is_depot_marker() {
            return Err(PenaltyError::Validation(format!(
                "Depot {} is not flagged as a depot marker",
                self.depot
            )));
        }

        for (idx, stop) in self.stops.iter().enumerate() {
            if stop.id != idx {
                return Err(PenaltyError::Validation(format!(
                    "Stop at index {} carries id {}",
                    idx, stop.id
                )));
            }
            if self.pred[self.succ[idx]] != idx {
                return Err(PenaltyError::Validation(format!(
                    "Links of stop {} are inconsistent",
                    idx
                )));
            }
            if idx >= self.real_count {
                match stop.mirror {
                    Some(m) if m < self.real_count => {}
                    Some(m) => return Err(PenaltyError::MirrorNotReal { stop: idx, mirror: m }),
                    None => return Err(PenaltyError::MissingMirror { stop: idx }),
                }
            }
        }

        let mut seen = 1;
        let mut n = self.succ[self.depot];
        while n != self.depot {
            seen += 1;
            if seen > len {
                break;
            }
            n = self.succ[n];
        }
        if seen != len {
            return Err(PenaltyError::Validation(format!(
                "Links form a cycle of {} stops, expected {}",
                seen, len
            )));
        }
        Ok(())
    }

    /// The same logical tour stored in the opposite physical direction.
    pub fn reversed(&self) -> Self {
        Self {
            stops: self.stops.clone(),
            succ: self.pred.clone(),
            pred: self.succ.clone(),
            real_count: self.real_count,
            depot: self.depot,
        }
    }

    pub fn set_potential(&mut self, id: StopId, pi: Fixed) {
        self.stops[id].pi = pi;
    }

    /// Stop ids in successor order, starting at the depot.
    pub fn sequence(&self) -> Vec<StopId> {
        let mut out = Vec::with_capacity(self.stops.len());
        let mut n = self.depot;
        loop {
            out.push(n);
            n = self.succ[n];
            if n == self.depot {
                break;
            }
        }
        out
    }
}

impl TourGraph for Tour {
    #[inline(always)]
    fn depot(&self) -> StopId {
        self.depot
    }

    #[inline(always)]
    fn real_count(&self) -> usize {
        self.real_count
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline(always)]
    fn succ(&self, id: StopId) -> StopId {
        self.succ[id]
    }

    #[inline(always)]
    fn pred(&self, id: StopId) -> StopId {
        self.pred[id]
    }

    #[inline(always)]
    fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tiny() -> Tour {
        // depot 0, customer 1; duplicates 2 and 3
        let stops = vec![
            Stop::depot(0, 1),
            Stop::customer(1, 0, 0),
            Stop {
                mirror: Some(0),
                ..Stop::depot(2, 1)
            },
            Stop {
                mirror: Some(1),
                ..Stop::customer(3, 0, 0)
            },
        ];
        Tour::from_sequence(stops, 2, 0, &[2, 0, 3, 1]).unwrap()
    }

    #[test]
    fn test_links_round_trip() {
        let t = tiny();
        assert_eq!(t.succ(0), 3);
        assert_eq!(t.pred(3), 0);
        assert_eq!(t.succ(1), 2);
        assert_eq!(t.sequence(), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_reversed_swaps_links() {
        let t = tiny().reversed();
        assert_eq!(t.succ(0), 2);
        assert_eq!(t.pred(0), 3);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_duplicate_in_order_rejected() {
        let stops = vec![Stop::depot(0, 1), Stop::customer(1, 0, 0)];
        let err = Tour::from_sequence(stops, 2, 0, &[0, 0]).unwrap_err();
        assert!(matches!(err, PenaltyError::Validation(_)));
    }

    #[rstest]
    #[case(&[0, 5])]
    #[case(&[5, 0])]
    #[case(&[1, usize::MAX])]
    fn test_out_of_range_id_rejected(#[case] order: &[StopId]) {
        let stops = vec![Stop::depot(0, 1), Stop::customer(1, 0, 0)];
        let err = Tour::from_sequence(stops, 1, 0, order).unwrap_err();
        assert!(matches!(err, PenaltyError::Validation(_)));
    }

    #[test]
    fn test_duplicate_without_mirror_rejected() {
        let stops = vec![Stop::depot(0, 1), Stop::customer(1, 0, 0)];
        let err = Tour::from_sequence(stops, 1, 0, &[0, 1]).unwrap_err();
        assert!(matches!(err, PenaltyError::MissingMirror { stop: 1 }));
    }
}
