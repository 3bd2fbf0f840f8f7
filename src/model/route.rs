//! Route results produced by the pathfinding engine.

use serde::{Deserialize, Serialize};

use crate::core::math::round2;
use crate::core::PlanPoint;

/// Use of a stairs/elevator facility inside a composed route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorTransition {
    /// Facility used for the transition
    pub facility_id: String,
    /// Decoded facility name
    pub facility_name: String,
    /// Floor the route arrives from
    pub from_floor: i32,
    /// Floor the route continues on
    pub to_floor: i32,
    /// Transition coordinate
    pub coordinate: PlanPoint,
    /// Index of the transition coordinate within [`Route::points`]
    pub point_index: usize,
}

/// An ordered coordinate sequence from start to end, inclusive.
///
/// An empty route is the normal "no route found" value, not an error.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    /// Coordinates from start to end
    pub points: Vec<PlanPoint>,
    /// Total Euclidean length, 2 decimal places
    pub distance: f64,
    /// Number of coordinates in the route
    pub node_count: usize,
    /// Floor transitions used, in route order
    pub transitions: Vec<FloorTransition>,
}

impl Route {
    /// The normal "unreachable" result.
    pub fn empty() -> Route {
        Route::default()
    }

    /// Build a route from an ordered point sequence, deriving distance and
    /// node count.
    pub fn from_points(points: Vec<PlanPoint>) -> Route {
        let distance = round2(polyline_length(&points));
        let node_count = points.len();
        Route {
            points,
            distance,
            node_count,
            transitions: Vec::new(),
        }
    }

    /// Whether a route was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        !self.points.is_empty()
    }

    /// First coordinate, when the route is non-empty.
    pub fn start(&self) -> Option<PlanPoint> {
        self.points.first().copied()
    }

    /// Last coordinate, when the route is non-empty.
    pub fn end(&self) -> Option<PlanPoint> {
        self.points.last().copied()
    }

    /// Join two same-venue legs at a shared transition point.
    ///
    /// `second` must start where `self` ends; the duplicated joint
    /// coordinate is dropped from the second leg.
    pub fn join(mut self, second: Route) -> Route {
        let joint = self.points.len().saturating_sub(1);
        self.points.extend(second.points.into_iter().skip(1));
        self.distance = round2(self.distance + second.distance);
        self.node_count = self.points.len();
        self.transitions
            .extend(second.transitions.into_iter().map(|mut t| {
                t.point_index += joint;
                t
            }));
        self
    }
}

fn polyline_length(points: &[PlanPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance(&pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_route_reads_as_not_found() {
        let r = Route::empty();
        assert!(!r.is_found());
        assert_eq!(r.node_count, 0);
        assert_eq!(r.distance, 0.0);
        assert!(r.start().is_none());
    }

    #[test]
    fn distance_sums_segments() {
        let r = Route::from_points(vec![
            PlanPoint::new(0.0, 0.0),
            PlanPoint::new(3.0, 4.0),
            PlanPoint::new(3.0, 14.0),
        ]);
        assert_eq!(r.distance, 15.0);
        assert_eq!(r.node_count, 3);
        assert_eq!(r.end(), Some(PlanPoint::new(3.0, 14.0)));
    }

    #[test]
    fn join_drops_duplicate_joint() {
        let a = Route::from_points(vec![PlanPoint::new(0.0, 0.0), PlanPoint::new(10.0, 0.0)]);
        let b = Route::from_points(vec![PlanPoint::new(10.0, 0.0), PlanPoint::new(10.0, 5.0)]);
        let joined = a.join(b);
        assert_eq!(joined.points.len(), 3);
        assert_eq!(joined.distance, 15.0);
        assert_eq!(joined.node_count, 3);
    }
}
