//! Persistence seam and the in-memory reference store.
//!
//! The engine never talks to a database directly: everything it loads or
//! persists goes through [`VenueStore`], implemented by the surrounding
//! application. [`MemoryVenueStore`] is the lock-backed reference
//! implementation used by the tests and by embedders without a database.

mod floors;

pub use floors::FloorConfig;

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::model::{Facility, FloorAssignment, Section};

/// Persistence contract implemented by the surrounding application.
pub trait VenueStore: Send + Sync {
    /// All sections of a venue.
    fn load_sections(&self, venue_id: i64) -> Result<Vec<Section>>;

    /// All facilities of a venue.
    fn load_facilities(&self, venue_id: i64) -> Result<Vec<Facility>>;

    /// A single facility by id, `None` when unknown.
    fn load_facility(&self, venue_id: i64, facility_id: &str) -> Result<Option<Facility>>;

    /// All explicit floor assignments of a venue.
    fn load_floor_assignments(&self, venue_id: i64) -> Result<Vec<FloorAssignment>>;

    /// Upsert sections by `(venue_id, section_id)`.
    fn save_sections(&self, sections: &[Section]) -> Result<()>;

    /// Upsert facilities by `(venue_id, facility_id)`.
    fn save_facilities(&self, facilities: &[Facility]) -> Result<()>;

    /// Upsert one assignment by `(venue_id, section_id)`.
    fn upsert_floor_assignment(&self, assignment: &FloorAssignment) -> Result<FloorAssignment>;

    /// Delete one venue's assignments, or a single section's when
    /// `section_id` is given. Returns the number removed.
    fn delete_floor_assignments(&self, venue_id: i64, section_id: Option<&str>) -> Result<usize>;
}

/// In-memory [`VenueStore`].
#[derive(Default)]
pub struct MemoryVenueStore {
    sections: RwLock<HashMap<(i64, String), Section>>,
    facilities: RwLock<HashMap<(i64, String), Facility>>,
    assignments: RwLock<HashMap<(i64, String), FloorAssignment>>,
}

impl MemoryVenueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VenueStore for MemoryVenueStore {
    fn load_sections(&self, venue_id: i64) -> Result<Vec<Section>> {
        let map = self.sections.read();
        let mut out: Vec<Section> = map
            .values()
            .filter(|s| s.venue_id == venue_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.section_id.cmp(&b.section_id));
        Ok(out)
    }

    fn load_facilities(&self, venue_id: i64) -> Result<Vec<Facility>> {
        let map = self.facilities.read();
        let mut out: Vec<Facility> = map
            .values()
            .filter(|f| f.venue_id == venue_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.facility_id.cmp(&b.facility_id));
        Ok(out)
    }

    fn load_facility(&self, venue_id: i64, facility_id: &str) -> Result<Option<Facility>> {
        let map = self.facilities.read();
        Ok(map.get(&(venue_id, facility_id.to_owned())).cloned())
    }

    fn load_floor_assignments(&self, venue_id: i64) -> Result<Vec<FloorAssignment>> {
        let map = self.assignments.read();
        let mut out: Vec<FloorAssignment> = map
            .values()
            .filter(|a| a.venue_id == venue_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.section_id.cmp(&b.section_id));
        Ok(out)
    }

    fn save_sections(&self, sections: &[Section]) -> Result<()> {
        let mut map = self.sections.write();
        for s in sections {
            map.insert((s.venue_id, s.section_id.clone()), s.clone());
        }
        Ok(())
    }

    fn save_facilities(&self, facilities: &[Facility]) -> Result<()> {
        let mut map = self.facilities.write();
        for f in facilities {
            map.insert((f.venue_id, f.facility_id.clone()), f.clone());
        }
        Ok(())
    }

    fn upsert_floor_assignment(&self, assignment: &FloorAssignment) -> Result<FloorAssignment> {
        let mut map = self.assignments.write();
        map.insert(
            (assignment.venue_id, assignment.section_id.clone()),
            assignment.clone(),
        );
        Ok(assignment.clone())
    }

    fn delete_floor_assignments(&self, venue_id: i64, section_id: Option<&str>) -> Result<usize> {
        let mut map = self.assignments.write();
        let before = map.len();
        match section_id {
            Some(id) => {
                map.remove(&(venue_id, id.to_owned()));
            }
            None => map.retain(|(v, _), _| *v != venue_id),
        }
        Ok(before - map.len())
    }
}
