//! Grid-discretized A* search over polygon obstacles.
//!
//! The continuous plan space is discretized into a lattice anchored at the
//! start coordinate with a fixed step. Nodes intersecting any obstacle
//! polygon (boundary-inclusive) are rejected; the search terminates when a
//! node comes within one grid step of the true end coordinate, and the
//! returned route ends exactly at the requested point, not a gridded
//! approximation.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::{debug, trace};

use crate::config::AStarSettings;
use crate::core::{NodeKey, PlanPoint, Polygon};
use crate::model::Route;

/// A node in the A* search
#[derive(Clone, Debug)]
struct AStarNode {
    point: PlanPoint,
    key: NodeKey,
    g_cost: f64, // Cost from start
    f_cost: f64, // g_cost + heuristic
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over a fixed obstacle set.
pub struct GridAStar<'a> {
    obstacles: &'a [Polygon],
    settings: &'a AStarSettings,
}

impl<'a> GridAStar<'a> {
    pub fn new(obstacles: &'a [Polygon], settings: &'a AStarSettings) -> Self {
        Self {
            obstacles,
            settings,
        }
    }

    /// Find a route between two plan coordinates.
    ///
    /// An empty route means "unreachable" (open set exhausted or the
    /// expansion bound hit) and is a normal outcome, not a fault.
    pub fn find_route(&self, start: PlanPoint, end: PlanPoint) -> Route {
        trace!(
            "[AStar] find_route: start=({:.1},{:.1}) end=({:.1},{:.1})",
            start.x,
            start.y,
            end.x,
            end.y
        );

        let step = self.settings.grid_step;
        let mut open_set = BinaryHeap::new();
        let mut closed_set: HashSet<NodeKey> = HashSet::new();
        let mut came_from: HashMap<NodeKey, NodeKey> = HashMap::new();
        let mut points: HashMap<NodeKey, PlanPoint> = HashMap::new();
        let mut g_scores: HashMap<NodeKey, f64> = HashMap::new();

        let start_key = start.node_key();
        points.insert(start_key, start);
        g_scores.insert(start_key, 0.0);
        open_set.push(AStarNode {
            point: start,
            key: start_key,
            g_cost: 0.0,
            f_cost: start.distance(&end),
        });

        let mut expansions = 0usize;

        while let Some(current) = open_set.pop() {
            expansions += 1;
            if expansions > self.settings.max_expansions {
                debug!(
                    "[AStar] no route: expansion bound hit ({} nodes)",
                    expansions
                );
                return Route::empty();
            }

            // Close enough to step off the grid onto the exact end point
            if current.point.distance(&end) < step {
                return self.reconstruct(&came_from, &points, current.key, end, expansions);
            }

            if !closed_set.insert(current.key) {
                continue;
            }

            for (neighbor, diagonal) in neighbors(current.point, step) {
                let key = neighbor.node_key();
                if closed_set.contains(&key) {
                    continue;
                }
                if self.blocked(neighbor) {
                    continue;
                }

                let move_cost = if diagonal {
                    step * self.settings.diagonal_cost
                } else {
                    step
                };
                let tentative_g = current.g_cost + move_cost;

                let known_g = g_scores.get(&key).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(key, current.key);
                    points.insert(key, neighbor);
                    g_scores.insert(key, tentative_g);
                    open_set.push(AStarNode {
                        point: neighbor,
                        key,
                        g_cost: tentative_g,
                        f_cost: tentative_g + neighbor.distance(&end),
                    });
                }
            }
        }

        debug!("[AStar] no route after {} expansions", expansions);
        Route::empty()
    }

    /// Boundary-inclusive obstacle test.
    fn blocked(&self, point: PlanPoint) -> bool {
        self.obstacles.iter().any(|poly| poly.contains(point))
    }

    fn reconstruct(
        &self,
        came_from: &HashMap<NodeKey, NodeKey>,
        points: &HashMap<NodeKey, PlanPoint>,
        last: NodeKey,
        end: PlanPoint,
        expansions: usize,
    ) -> Route {
        let mut keys = vec![last];
        let mut current = last;
        while let Some(&prev) = came_from.get(&current) {
            keys.push(prev);
            current = prev;
        }
        keys.reverse();

        let mut route_points: Vec<PlanPoint> = keys
            .into_iter()
            .filter_map(|k| points.get(&k).copied())
            .collect();
        if route_points.last() != Some(&end) {
            route_points.push(end);
        }

        let route = Route::from_points(route_points);
        trace!(
            "[AStar] route found: {} points, distance={:.2}, expansions={}",
            route.node_count,
            route.distance,
            expansions
        );
        route
    }
}

/// 8-connected neighborhood; the flag marks diagonal moves.
fn neighbors(p: PlanPoint, step: f64) -> [(PlanPoint, bool); 8] {
    [
        (PlanPoint::new(p.x, p.y + step), false),
        (PlanPoint::new(p.x + step, p.y), false),
        (PlanPoint::new(p.x, p.y - step), false),
        (PlanPoint::new(p.x - step, p.y), false),
        (PlanPoint::new(p.x + step, p.y + step), true),
        (PlanPoint::new(p.x + step, p.y - step), true),
        (PlanPoint::new(p.x - step, p.y - step), true),
        (PlanPoint::new(p.x - step, p.y + step), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AStarSettings {
        AStarSettings {
            max_expansions: 20_000,
            ..AStarSettings::default()
        }
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(&[
            PlanPoint::new(x0, y0),
            PlanPoint::new(x1, y0),
            PlanPoint::new(x1, y1),
            PlanPoint::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn straight_route_on_open_plan() {
        let settings = settings();
        let astar = GridAStar::new(&[], &settings);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), PlanPoint::new(100.0, 0.0));

        assert!(route.is_found());
        assert_eq!(route.distance, 100.0);
        assert_eq!(route.points.first(), Some(&PlanPoint::new(0.0, 0.0)));
        assert_eq!(route.points.last(), Some(&PlanPoint::new(100.0, 0.0)));
    }

    #[test]
    fn route_ends_exactly_at_requested_point() {
        let settings = settings();
        let astar = GridAStar::new(&[], &settings);
        let end = PlanPoint::new(73.4, 21.7);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), end);

        assert!(route.is_found());
        assert_eq!(route.points.last(), Some(&end));
    }

    #[test]
    fn route_avoids_obstacle() {
        let settings = settings();
        let wall = rect(40.0, -30.0, 60.0, 30.0);
        let obstacles = vec![wall.clone()];
        let astar = GridAStar::new(&obstacles, &settings);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), PlanPoint::new(100.0, 0.0));

        assert!(route.is_found());
        // no coordinate may touch the obstacle (boundary-inclusive)
        assert!(route.points.iter().all(|p| !wall.contains(*p)));
        // detouring must cost more than the straight line
        assert!(route.distance > 100.0);
    }

    #[test]
    fn enclosed_end_is_unreachable() {
        let settings = AStarSettings {
            max_expansions: 3_000,
            ..AStarSettings::default()
        };
        // end fully enclosed, no gap
        let obstacles = vec![rect(60.0, -40.0, 140.0, 40.0)];
        let astar = GridAStar::new(&obstacles, &settings);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), PlanPoint::new(100.0, 0.0));

        assert!(!route.is_found());
        assert_eq!(route.node_count, 0);
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn start_within_one_step_of_end() {
        let settings = settings();
        let astar = GridAStar::new(&[], &settings);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), PlanPoint::new(3.0, 0.0));

        assert!(route.is_found());
        assert_eq!(route.points.len(), 2);
        assert_eq!(route.distance, 3.0);
    }

    #[test]
    fn diagonal_moves_cost_more() {
        let settings = settings();
        let astar = GridAStar::new(&[], &settings);
        let route = astar.find_route(PlanPoint::new(0.0, 0.0), PlanPoint::new(50.0, 50.0));

        assert!(route.is_found());
        // pure diagonal: 50*sqrt(2) ≈ 70.71, far below the manhattan 100
        assert!(route.distance < 75.0);
        assert!(route.distance >= 70.7);
    }
}
