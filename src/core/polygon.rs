//! Polygon ring with boundary-inclusive containment.

use serde::{Deserialize, Serialize};

use super::math::round1;
use super::point::PlanPoint;

/// Tolerance for the on-edge check in [`Polygon::contains`].
const EDGE_EPS: f64 = 1e-9;

/// A closed polygon built from an ordered vertex ring.
///
/// Construction closes the ring (the first vertex is appended for the
/// geometric tests). Rings with fewer than 3 distinct vertices are not
/// polygons: [`Polygon::new`] returns `None` and callers treat the shape
/// as "no obstacle" rather than an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Closed ring: `ring.first() == ring.last()`
    ring: Vec<PlanPoint>,
}

impl Polygon {
    /// Build a polygon from an open vertex ring.
    ///
    /// Returns `None` when the ring has fewer than 3 distinct vertices.
    pub fn new(vertices: &[PlanPoint]) -> Option<Polygon> {
        let mut distinct: Vec<PlanPoint> = Vec::with_capacity(vertices.len());
        for v in vertices {
            if !distinct.contains(v) {
                distinct.push(*v);
            }
        }
        if distinct.len() < 3 {
            return None;
        }

        let mut ring: Vec<PlanPoint> = vertices.to_vec();
        if ring.first() != ring.last() {
            ring.push(vertices[0]);
        }
        Some(Polygon { ring })
    }

    /// Vertices of the closed ring (first == last).
    pub fn ring(&self) -> &[PlanPoint] {
        &self.ring
    }

    /// Boundary-inclusive containment test.
    ///
    /// A point exactly on an edge counts as inside, which is what obstacle
    /// avoidance wants: grid nodes touching an obstacle boundary are
    /// rejected.
    pub fn contains(&self, point: PlanPoint) -> bool {
        for edge in self.ring.windows(2) {
            if on_segment(edge[0], edge[1], point) {
                return true;
            }
        }

        // Standard ray cast; crossings counted against a ray toward +X.
        let mut inside = false;
        for edge in self.ring.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if (a.y > point.y) != (b.y > point.y) {
                let t = (point.y - a.y) / (b.y - a.y);
                let cross_x = a.x + t * (b.x - a.x);
                if point.x < cross_x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Arithmetic mean of the open-ring vertices, rounded to the stored
    /// coordinate precision.
    pub fn centroid(&self) -> PlanPoint {
        centroid_of(&self.ring[..self.ring.len() - 1])
    }
}

/// Arithmetic-mean centroid of a vertex list, rounded to 1 decimal place.
pub fn centroid_of(vertices: &[PlanPoint]) -> PlanPoint {
    if vertices.is_empty() {
        return PlanPoint::ZERO;
    }
    let n = vertices.len() as f64;
    let sx: f64 = vertices.iter().map(|v| v.x).sum();
    let sy: f64 = vertices.iter().map(|v| v.y).sum();
    PlanPoint::new(round1(sx / n), round1(sy / n))
}

/// Whether `p` lies on the segment `a`..`b` (within tolerance).
fn on_segment(a: PlanPoint, b: PlanPoint, p: PlanPoint) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > EDGE_EPS * (1.0 + a.distance(&b)) {
        return false;
    }
    p.x >= a.x.min(b.x) - EDGE_EPS
        && p.x <= a.x.max(b.x) + EDGE_EPS
        && p.y >= a.y.min(b.y) - EDGE_EPS
        && p.y <= a.y.max(b.y) + EDGE_EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(&[
            PlanPoint::new(0.0, 0.0),
            PlanPoint::new(10.0, 0.0),
            PlanPoint::new(10.0, 10.0),
            PlanPoint::new(0.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn ring_is_closed() {
        let p = square();
        assert_eq!(p.ring().len(), 5);
        assert_eq!(p.ring().first(), p.ring().last());
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(Polygon::new(&[]).is_none());
        assert!(Polygon::new(&[PlanPoint::new(1.0, 1.0), PlanPoint::new(2.0, 2.0)]).is_none());
        // 3 vertices but only 2 distinct
        assert!(Polygon::new(&[
            PlanPoint::new(1.0, 1.0),
            PlanPoint::new(2.0, 2.0),
            PlanPoint::new(1.0, 1.0),
        ])
        .is_none());
    }

    #[test]
    fn contains_interior_and_boundary() {
        let p = square();
        assert!(p.contains(PlanPoint::new(5.0, 5.0)));
        // exactly on an edge counts as inside
        assert!(p.contains(PlanPoint::new(10.0, 5.0)));
        assert!(p.contains(PlanPoint::new(0.0, 0.0)));
        assert!(!p.contains(PlanPoint::new(10.1, 5.0)));
        assert!(!p.contains(PlanPoint::new(-0.1, -0.1)));
    }

    #[test]
    fn centroid_of_square() {
        assert_eq!(square().centroid(), PlanPoint::new(5.0, 5.0));
    }

    #[test]
    fn contains_concave() {
        // L-shape; the notch is outside
        let p = Polygon::new(&[
            PlanPoint::new(0.0, 0.0),
            PlanPoint::new(10.0, 0.0),
            PlanPoint::new(10.0, 4.0),
            PlanPoint::new(4.0, 4.0),
            PlanPoint::new(4.0, 10.0),
            PlanPoint::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(p.contains(PlanPoint::new(2.0, 8.0)));
        assert!(p.contains(PlanPoint::new(8.0, 2.0)));
        assert!(!p.contains(PlanPoint::new(8.0, 8.0)));
    }
}
