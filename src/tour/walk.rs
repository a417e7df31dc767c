use super::TourGraph;
use crate::core_types::StopId;
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Which link the evaluator follows to move forward along the logical tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Successor,
    Predecessor,
}

impl Orientation {
    /// If the depot is immediately followed by its own duplicate, the tour is
    /// stored backwards and predecessor links lead forward.
    #[inline(always)]
    pub fn detect<G: TourGraph + ?Sized>(tour: &G) -> Self {
        let depot = tour.depot();
        if tour.succ(depot) != depot + tour.real_count() {
            Orientation::Successor
        } else {
            Orientation::Predecessor
        }
    }

    #[inline(always)]
    pub fn advance<G: TourGraph + ?Sized>(self, tour: &G, id: StopId) -> StopId {
        match self {
            Orientation::Successor => tour.succ(id),
            Orientation::Predecessor => tour.pred(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A new route begins at this stop.
    Route(StopId),
    /// An edge that contributes to the current route.
    Leg { from: StopId, to: StopId },
}

/// Walks the whole tour once, route by route, starting at a depot marker.
///
/// Legs are only produced for edges leaving a real stop or a depot marker and
/// not ending at a depot marker; edges into duplicates-of-real pairs and
/// route-closing edges are skipped. The walk ends when it lands back on
/// `start`.
pub struct RouteWalk<'a, G: TourGraph + ?Sized> {
    tour: &'a G,
    orientation: Orientation,
    start: StopId,
    node: StopId,
    at_route_start: bool,
    done: bool,
}

impl<'a, G: TourGraph + ?Sized> RouteWalk<'a, G> {
    pub fn new(tour: &'a G, start: StopId, orientation: Orientation) -> Self {
        debug_assert!(tour.is_depot_marker(start));
        Self {
            tour,
            orientation,
            start,
            node: start,
            at_route_start: true,
            done: false,
        }
    }
}

impl<G: TourGraph + ?Sized> Iterator for RouteWalk<'_, G> {
    type Item = Step;

    #[inline]
    fn next(&mut self) -> Option<Step> {
        loop {
            if self.done {
                return None;
            }
            if self.at_route_start {
                self.at_route_start = false;
                return Some(Step::Route(self.node));
            }

            let from = self.node;
            let to = self.orientation.advance(self.tour, from);
            self.node = to;

            let to_is_marker = self.tour.is_depot_marker(to);
            if to_is_marker {
                if to == self.start {
                    self.done = true;
                } else {
                    self.at_route_start = true;
                }
            }

            if !to_is_marker && (self.tour.is_real(from) || self.tour.is_depot_marker(from)) {
                return Some(Step::Leg { from, to });
            }
        }
    }
}
