use super::{Stop, Tour};
use crate::core_types::StopId;
use crate::error::{PenaltyError, PtResult};
use tracing::{debug, warn};

/// Lays out a multi-route plan as one circular tour.
///
/// Every real stop `k` gets a virtual duplicate `k + n` that mirrors it, and
/// each route contributes `d', d, c1', c1, ..., cm', cm` to the cycle, where
/// `d` is the route's depot marker. The result is stored in successor
/// orientation; use [`Tour::reversed`] for the opposite storage.
pub struct TourBuilder {
    stops: Vec<Stop>,
    depot: StopId,
}

impl TourBuilder {
    /// `stops` are the real stops; their ids must match their positions.
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops, depot: 0 }
    }

    pub fn depot(mut self, depot: StopId) -> Self {
        self.depot = depot;
        self
    }

    /// Each route starts with a depot marker followed by its customers.
    pub fn build(self, routes: &[Vec<StopId>]) -> PtResult<Tour> {
        let n = self.stops.len();
        if n == 0 {
            return Err(PenaltyError::Validation("No real stops given".to_string()));
        }
        if self.depot >= n || !self.stops[self.depot].is_depot_marker() {
            return Err(PenaltyError::Validation(format!(
                "Depot {} is not a real depot marker",
                self.depot
            )));
        }

        let mut placed = vec![false; n];
        for (r, route) in routes.iter().enumerate() {
            let Some(&head) = route.first() else {
                return Err(PenaltyError::Validation(format!("Route {} is empty", r)));
            };
            for (pos, &id) in route.iter().enumerate() {
                if id >= n {
                    return Err(PenaltyError::Validation(format!(
                        "Route {} references unknown stop {}",
                        r, id
                    )));
                }
                if placed[id] {
                    return Err(PenaltyError::Validation(format!(
                        "Stop {} is visited more than once",
                        id
                    )));
                }
                placed[id] = true;

                let is_marker = self.stops[id].is_depot_marker();
                if pos == 0 && !is_marker {
                    return Err(PenaltyError::Validation(format!(
                        "Route {} starts at {}, which is not a depot marker",
                        r, head
                    )));
                }
                if pos > 0 && is_marker {
                    return Err(PenaltyError::Validation(format!(
                        "Depot marker {} appears inside route {}",
                        id, r
                    )));
                }
            }
            if route.len() == 1 {
                warn!("Route {} (depot marker {}) has no customers", r, head);
            }
        }
        if let Some(missing) = placed.iter().position(|&p| !p) {
            return Err(PenaltyError::Validation(format!(
                "Stop {} is not part of any route",
                missing
            )));
        }

        let mut all = self.stops;
        for (idx, s) in all.iter().enumerate() {
            if s.id != idx {
                return Err(PenaltyError::Validation(format!(
                    "Stop at index {} carries id {}",
                    idx, s.id
                )));
            }
        }
        for k in 0..n {
            let depot_id = all[k].depot_id;
            all.push(Stop {
                id: k + n,
                depot_id,
                pi: 0,
                service_time: 0,
                wait: 0,
                mirror: Some(k),
            });
        }

        let mut order = Vec::with_capacity(2 * n);
        for route in routes {
            for &id in route {
                order.push(id + n);
                order.push(id);
            }
        }

        debug!(
            "Depot-split tour: {} real stops, {} routes, {} nodes",
            n,
            routes.len(),
            order.len()
        );
        Tour::from_sequence(all, n, self.depot, &order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::TourGraph;

    fn stops() -> Vec<Stop> {
        vec![
            Stop::depot(0, 1),
            Stop::customer(1, 0, 0),
            Stop::customer(2, 0, 0),
            Stop::depot(3, 2),
        ]
    }

    #[test]
    fn test_split_layout() {
        let tour = TourBuilder::new(stops())
            .build(&[vec![0, 1], vec![3, 2]])
            .unwrap();
        // 4 real + 4 duplicates
        assert_eq!(tour.len(), 8);
        assert_eq!(tour.sequence(), vec![0, 5, 1, 7, 3, 6, 2, 4]);
        assert_eq!(tour.stop(5).mirror, Some(1));
        assert!(tour.is_depot_marker(7));
    }

    #[test]
    fn test_missing_stop_rejected() {
        let err = TourBuilder::new(stops())
            .build(&[vec![0, 1], vec![3]])
            .unwrap_err();
        assert!(err.to_string().contains("Stop 2 is not part of any route"));
    }

    #[test]
    fn test_route_must_start_at_marker() {
        let err = TourBuilder::new(stops())
            .build(&[vec![1, 0], vec![3, 2]])
            .unwrap_err();
        assert!(matches!(err, PenaltyError::Validation(_)));
    }
}
