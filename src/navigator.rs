//! Query facade: same-floor routes, facility targeting, point-in-section
//! queries, and multi-floor route composition.

use std::sync::Arc;

use log::debug;

use crate::config::AStarSettings;
use crate::core::{PlanPoint, Polygon};
use crate::error::{NavError, Result};
use crate::model::{Facility, FloorTransition, Route};
use crate::pathfinding::GridAStar;
use crate::store::VenueStore;

/// Pathfinding queries over a venue store.
///
/// Stateless per call: the obstacle set is loaded fresh from the store for
/// every query, so concurrent queries for different venues are fully
/// independent.
pub struct Navigator<S: VenueStore> {
    store: Arc<S>,
    settings: AStarSettings,
}

impl<S: VenueStore> Navigator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_settings(store, AStarSettings::default())
    }

    pub fn with_settings(store: Arc<S>, settings: AStarSettings) -> Self {
        Self { store, settings }
    }

    /// Same-floor route between two coordinates, avoiding the venue's
    /// obstacle sections. An empty route means no route was found.
    pub fn find_path(
        &self,
        venue_id: i64,
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
    ) -> Result<Route> {
        let obstacles = self.obstacles(venue_id)?;
        let astar = GridAStar::new(&obstacles, &self.settings);
        Ok(astar.find_route(
            PlanPoint::new(start_x, start_y),
            PlanPoint::new(end_x, end_y),
        ))
    }

    /// Route between coordinates on possibly different floors.
    ///
    /// Same-floor requests delegate to [`Navigator::find_path`]. Otherwise
    /// the route goes through a stairs/elevator facility connecting both
    /// floors; when several qualify, the one nearest to the start
    /// coordinate wins (policy choice). No qualifying facility is a hard
    /// [`NavError::NoFloorRoute`], distinct from the soft empty route.
    pub fn find_path_between_floors(
        &self,
        venue_id: i64,
        start: PlanPoint,
        end: PlanPoint,
        start_floor: i32,
        end_floor: i32,
    ) -> Result<Route> {
        if start_floor == end_floor {
            return self.find_path(venue_id, start.x, start.y, end.x, end.y);
        }

        let transit = self
            .nearest_transit(venue_id, start, start_floor, end_floor)?
            .ok_or(NavError::NoFloorRoute {
                from: start_floor,
                to: end_floor,
            })?;
        debug!(
            "[Navigator] floors {}->{} via {:?}",
            start_floor, end_floor, transit.facility_id
        );

        let to_transit = self.find_path(
            venue_id,
            start.x,
            start.y,
            transit.coordinate.x,
            transit.coordinate.y,
        )?;
        let from_transit = self.find_path(
            venue_id,
            transit.coordinate.x,
            transit.coordinate.y,
            end.x,
            end.y,
        )?;
        if !to_transit.is_found() || !from_transit.is_found() {
            debug!(
                "[Navigator] leg unreachable around {:?}, returning empty route",
                transit.facility_id
            );
            return Ok(Route::empty());
        }

        let transition = FloorTransition {
            facility_id: transit.facility_id.clone(),
            facility_name: transit.name.clone(),
            from_floor: start_floor,
            to_floor: end_floor,
            coordinate: transit.coordinate,
            point_index: to_transit.points.len() - 1,
        };
        let mut route = to_transit.join(from_transit);
        route.transitions.push(transition);
        route.transitions.sort_by_key(|t| t.point_index);
        Ok(route)
    }

    /// Route from a coordinate to a named facility. Unknown facility ids
    /// resolve to an empty route, not an error.
    pub fn find_path_to_facility(
        &self,
        venue_id: i64,
        start_x: f64,
        start_y: f64,
        facility_id: &str,
    ) -> Result<Route> {
        match self.store.load_facility(venue_id, facility_id)? {
            Some(facility) => self.find_path(
                venue_id,
                start_x,
                start_y,
                facility.coordinate.x,
                facility.coordinate.y,
            ),
            None => {
                debug!("[Navigator] unknown facility {:?}", facility_id);
                Ok(Route::empty())
            }
        }
    }

    /// Boundary-inclusive test of a coordinate against a named section.
    /// Unknown sections and degenerate rings read as `false`.
    pub fn is_point_in_section(
        &self,
        venue_id: i64,
        section_id: &str,
        x: f64,
        y: f64,
    ) -> Result<bool> {
        let sections = self.store.load_sections(venue_id)?;
        let hit = sections
            .iter()
            .find(|s| s.section_id == section_id)
            .and_then(|s| s.polygon())
            .map(|poly| poly.contains(PlanPoint::new(x, y)))
            .unwrap_or(false);
        Ok(hit)
    }

    /// Obstacle polygons of a venue: every section whose kind blocks
    /// movement and whose ring is usable.
    fn obstacles(&self, venue_id: i64) -> Result<Vec<Polygon>> {
        let sections = self.store.load_sections(venue_id)?;
        Ok(sections
            .iter()
            .filter(|s| s.is_obstacle())
            .filter_map(|s| s.polygon())
            .collect())
    }

    /// Nearest facility (by Euclidean distance to `start`) connecting the
    /// two floors.
    fn nearest_transit(
        &self,
        venue_id: i64,
        start: PlanPoint,
        from: i32,
        to: i32,
    ) -> Result<Option<Facility>> {
        let facilities = self.store.load_facilities(venue_id)?;
        Ok(facilities
            .into_iter()
            .filter(|f| f.connects(from, to))
            .min_by(|a, b| {
                let da = a.coordinate.distance_squared(&start);
                let db = b.coordinate.distance_squared(&start);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FacilityKind, Section, SectionKind};
    use crate::store::MemoryVenueStore;
    use std::collections::BTreeSet;

    fn test_settings() -> AStarSettings {
        AStarSettings {
            max_expansions: 20_000,
            ..AStarSettings::default()
        }
    }

    fn stairs(venue: i64, id: &str, x: f64, y: f64, floors: &[i32]) -> Facility {
        Facility {
            venue_id: venue,
            facility_id: id.to_owned(),
            name: id.to_owned(),
            kind: FacilityKind::Stairs,
            coordinate: PlanPoint::new(x, y),
            floor: floors[0],
            connected_floors: floors.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn navigator_with(
        sections: Vec<Section>,
        facilities: Vec<Facility>,
    ) -> Navigator<MemoryVenueStore> {
        let store = MemoryVenueStore::new();
        store.save_sections(&sections).unwrap();
        store.save_facilities(&facilities).unwrap();
        Navigator::with_settings(Arc::new(store), test_settings())
    }

    #[test]
    fn open_venue_route_is_straight() {
        let nav = navigator_with(vec![], vec![]);
        let route = nav.find_path(1, 0.0, 0.0, 100.0, 0.0).unwrap();
        assert_eq!(route.distance, 100.0);
        assert_eq!(route.start(), Some(PlanPoint::new(0.0, 0.0)));
        assert_eq!(route.end(), Some(PlanPoint::new(100.0, 0.0)));
    }

    #[test]
    fn route_respects_is_point_in_section() {
        let wall = Section::new(
            1,
            "wall",
            vec![
                PlanPoint::new(40.0, -30.0),
                PlanPoint::new(60.0, -30.0),
                PlanPoint::new(60.0, 30.0),
                PlanPoint::new(40.0, 30.0),
            ],
            1,
            SectionKind::Wall,
        )
        .unwrap();
        let nav = navigator_with(vec![wall], vec![]);

        let route = nav.find_path(1, 0.0, 0.0, 100.0, 0.0).unwrap();
        assert!(route.is_found());
        for p in &route.points {
            assert!(!nav.is_point_in_section(1, "wall", p.x, p.y).unwrap());
        }
    }

    #[test]
    fn passable_sections_do_not_block() {
        let corridor = Section::new(
            1,
            "aisle",
            vec![
                PlanPoint::new(40.0, -30.0),
                PlanPoint::new(60.0, -30.0),
                PlanPoint::new(60.0, 30.0),
                PlanPoint::new(40.0, 30.0),
            ],
            1,
            SectionKind::Corridor,
        )
        .unwrap();
        let nav = navigator_with(vec![corridor], vec![]);
        let route = nav.find_path(1, 0.0, 0.0, 100.0, 0.0).unwrap();
        assert_eq!(route.distance, 100.0);
    }

    #[test]
    fn point_in_section_soft_not_found() {
        let nav = navigator_with(vec![], vec![]);
        assert!(!nav.is_point_in_section(1, "ghost", 1.0, 1.0).unwrap());
    }

    #[test]
    fn path_to_unknown_facility_is_empty() {
        let nav = navigator_with(vec![], vec![]);
        let route = nav.find_path_to_facility(1, 0.0, 0.0, "nowhere").unwrap();
        assert!(!route.is_found());
    }

    #[test]
    fn path_to_facility_ends_at_its_coordinate() {
        let nav = navigator_with(vec![], vec![stairs(1, "s1", 80.0, 0.0, &[1, 2])]);
        let route = nav.find_path_to_facility(1, 0.0, 0.0, "s1").unwrap();
        assert_eq!(route.end(), Some(PlanPoint::new(80.0, 0.0)));
    }

    #[test]
    fn multi_floor_route_composes_through_nearest_stairs() {
        let nav = navigator_with(
            vec![],
            vec![
                stairs(1, "far", 500.0, 0.0, &[1, 2]),
                stairs(1, "near", 100.0, 0.0, &[1, 2]),
            ],
        );
        let route = nav
            .find_path_between_floors(1, PlanPoint::new(0.0, 0.0), PlanPoint::new(200.0, 0.0), 1, 2)
            .unwrap();

        assert!(route.is_found());
        assert_eq!(route.transitions.len(), 1);
        let t = &route.transitions[0];
        assert_eq!(t.facility_id, "near");
        assert_eq!(t.from_floor, 1);
        assert_eq!(t.to_floor, 2);
        assert_eq!(route.points[t.point_index], PlanPoint::new(100.0, 0.0));
        // start -> stairs (100) + stairs -> end (100)
        assert_eq!(route.distance, 200.0);
    }

    #[test]
    fn same_floor_request_has_no_transition() {
        let nav = navigator_with(vec![], vec![stairs(1, "s1", 50.0, 0.0, &[1, 2])]);
        let route = nav
            .find_path_between_floors(1, PlanPoint::new(0.0, 0.0), PlanPoint::new(100.0, 0.0), 2, 2)
            .unwrap();
        assert!(route.transitions.is_empty());
        assert_eq!(route.distance, 100.0);
    }

    #[test]
    fn missing_transit_is_a_hard_error() {
        let nav = navigator_with(vec![], vec![stairs(1, "s1", 50.0, 0.0, &[1, 2])]);
        let err = nav
            .find_path_between_floors(1, PlanPoint::new(0.0, 0.0), PlanPoint::new(100.0, 0.0), 1, 3)
            .unwrap_err();
        assert!(matches!(err, NavError::NoFloorRoute { from: 1, to: 3 }));
    }
}
