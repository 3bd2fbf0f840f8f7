//! Floor assignment service: authoritative and estimated floor lookups.
//!
//! Explicit assignments are authoritative; the coordinate estimator is a
//! documented heuristic fallback for plans without authored floor data.
//! Lookups are cached per venue; any write clears the whole cache rather
//! than tracking fine-grained dependencies, trading cache churn for a
//! trivially correct consistency story.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::config::ParserSettings;
use crate::error::{NavError, Result};
use crate::model::{FloorAssignment, MAX_FLOOR, MIN_FLOOR};
use crate::store::VenueStore;

/// Floor returned when a section has no explicit assignment.
const DEFAULT_FLOOR: i32 = 1;

/// Cached floor lookups over a [`VenueStore`].
pub struct FloorConfig<S: VenueStore> {
    store: Arc<S>,
    settings: ParserSettings,
    /// venue → section → assigned floor
    cache: RwLock<HashMap<i64, HashMap<String, i32>>>,
}

impl<S: VenueStore> FloorConfig<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_settings(store, ParserSettings::default())
    }

    pub fn with_settings(store: Arc<S>, settings: ParserSettings) -> Self {
        Self {
            store,
            settings,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Assigned floor for a section, defaulting to 1 when unmapped.
    pub fn floor_of(&self, venue_id: i64, section_id: &str) -> Result<i32> {
        Ok(self
            .explicit_floor(venue_id, section_id)?
            .unwrap_or(DEFAULT_FLOOR))
    }

    /// Explicitly assigned floor, `None` when unmapped. Used by the parser's
    /// fallback chain, which must distinguish "assigned" from "defaulted".
    pub fn explicit_floor(&self, venue_id: i64, section_id: &str) -> Result<Option<i32>> {
        let venue = self.venue_map(venue_id)?;
        Ok(venue.get(section_id).copied().filter(|f| *f > 0))
    }

    /// Section ids assigned to a floor.
    pub fn sections_on_floor(&self, venue_id: i64, floor: i32) -> Result<BTreeSet<String>> {
        let venue = self.venue_map(venue_id)?;
        Ok(venue
            .iter()
            .filter(|(_, f)| **f == floor)
            .map(|(id, _)| id.clone())
            .collect())
    }

    /// Sorted distinct floors with at least one assignment.
    pub fn floors(&self, venue_id: i64) -> Result<Vec<i32>> {
        let venue = self.venue_map(venue_id)?;
        let set: BTreeSet<i32> = venue.values().copied().collect();
        Ok(set.into_iter().collect())
    }

    /// Assign a section to a floor, replacing any prior assignment.
    pub fn set_floor(
        &self,
        venue_id: i64,
        section_id: &str,
        floor: i32,
        description: Option<String>,
    ) -> Result<FloorAssignment> {
        validate_entry(venue_id, section_id, floor)?;
        let assignment = FloorAssignment {
            venue_id,
            section_id: section_id.to_owned(),
            floor,
            description,
        };
        let saved = self.store.upsert_floor_assignment(&assignment)?;
        self.invalidate();
        Ok(saved)
    }

    /// Assign many sections at once. The whole batch is validated before
    /// anything is written: one bad entry rejects the batch with no
    /// partial writes.
    pub fn set_floors_batch(
        &self,
        venue_id: i64,
        entries: &[(String, i32)],
    ) -> Result<Vec<FloorAssignment>> {
        if entries.is_empty() {
            return Err(NavError::InvalidInput("empty floor batch".into()));
        }
        for (section_id, floor) in entries {
            validate_entry(venue_id, section_id, *floor)?;
        }

        let mut saved = Vec::with_capacity(entries.len());
        for (section_id, floor) in entries {
            let assignment = FloorAssignment::new(venue_id, section_id.clone(), *floor);
            saved.push(self.store.upsert_floor_assignment(&assignment)?);
        }
        self.invalidate();
        Ok(saved)
    }

    /// Remove one section's assignment.
    pub fn remove_floor_config(&self, venue_id: i64, section_id: &str) -> Result<usize> {
        let removed = self
            .store
            .delete_floor_assignments(venue_id, Some(section_id))?;
        self.invalidate();
        Ok(removed)
    }

    /// Remove every assignment of a venue.
    pub fn remove_all_floor_configs(&self, venue_id: i64) -> Result<usize> {
        let removed = self.store.delete_floor_assignments(venue_id, None)?;
        self.invalidate();
        Ok(removed)
    }

    /// Heuristic floor estimate for a coordinate on a plan of known size:
    /// within the configured margin (default 15%) of the left, right, or
    /// bottom edge reads as floor 2, everything else as floor 1. A coarse
    /// default for plans without authored floor data, not a geometric
    /// guarantee.
    pub fn estimate_floor_by_coordinate(
        &self,
        x: f64,
        y: f64,
        plan_width: f64,
        plan_height: f64,
    ) -> i32 {
        if plan_width <= 0.0 || plan_height <= 0.0 {
            return DEFAULT_FLOOR;
        }
        let margin = self.settings.edge_margin_ratio;
        let near_left = x <= plan_width * margin;
        let near_right = x >= plan_width * (1.0 - margin);
        let near_bottom = y >= plan_height * (1.0 - margin);
        if near_left || near_right || near_bottom {
            2
        } else {
            DEFAULT_FLOOR
        }
    }

    fn venue_map(&self, venue_id: i64) -> Result<HashMap<String, i32>> {
        if let Some(venue) = self.cache.read().get(&venue_id) {
            return Ok(venue.clone());
        }

        let assignments = self.store.load_floor_assignments(venue_id)?;
        let venue: HashMap<String, i32> = assignments
            .into_iter()
            .map(|a| (a.section_id, a.floor))
            .collect();
        self.cache.write().insert(venue_id, venue.clone());
        Ok(venue)
    }

    fn invalidate(&self) {
        debug!("[FloorConfig] invalidating floor lookup cache");
        self.cache.write().clear();
    }
}

fn validate_entry(venue_id: i64, section_id: &str, floor: i32) -> Result<()> {
    if venue_id <= 0 {
        return Err(NavError::InvalidInput(format!(
            "venue id must be positive, got {venue_id}"
        )));
    }
    if section_id.trim().is_empty() {
        return Err(NavError::InvalidInput("blank section id".into()));
    }
    if !(MIN_FLOOR..=MAX_FLOOR).contains(&floor) {
        return Err(NavError::InvalidInput(format!(
            "floor {floor} outside {MIN_FLOOR}..={MAX_FLOOR}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryVenueStore;

    fn service() -> FloorConfig<MemoryVenueStore> {
        FloorConfig::new(Arc::new(MemoryVenueStore::new()))
    }

    #[test]
    fn unmapped_section_defaults_to_floor_one() {
        let floors = service();
        assert_eq!(floors.floor_of(1, "nope").unwrap(), 1);
        // repeated calls stay consistent
        assert_eq!(floors.floor_of(1, "nope").unwrap(), 1);
    }

    #[test]
    fn explicit_assignment_wins_over_default() {
        let floors = service();
        floors.set_floor(7, "A", 3, None).unwrap();
        assert_eq!(floors.floor_of(7, "A").unwrap(), 3);
        assert_eq!(floors.explicit_floor(7, "A").unwrap(), Some(3));
    }

    #[test]
    fn write_invalidates_cached_read() {
        let floors = service();
        // prime the cache with the unmapped default
        assert_eq!(floors.floor_of(1, "A").unwrap(), 1);
        floors.set_floor(1, "A", 5, None).unwrap();
        assert_eq!(floors.floor_of(1, "A").unwrap(), 5);
    }

    #[test]
    fn validation_rejects_bad_entries() {
        let floors = service();
        assert!(floors.set_floor(0, "A", 1, None).is_err());
        assert!(floors.set_floor(1, "  ", 1, None).is_err());
        assert!(floors.set_floor(1, "A", 0, None).is_err());
        assert!(floors.set_floor(1, "A", 101, None).is_err());
    }

    #[test]
    fn batch_is_atomic() {
        let floors = service();
        let entries = vec![("A".to_owned(), 2), ("B".to_owned(), 0)];
        assert!(floors.set_floors_batch(1, &entries).is_err());
        // the valid first entry must not have been written
        assert_eq!(floors.explicit_floor(1, "A").unwrap(), None);

        assert!(floors.set_floors_batch(1, &[]).is_err());

        let ok = vec![("A".to_owned(), 2), ("B".to_owned(), 3)];
        assert_eq!(floors.set_floors_batch(1, &ok).unwrap().len(), 2);
        assert_eq!(floors.floor_of(1, "B").unwrap(), 3);
    }

    #[test]
    fn floor_listing_and_removal() {
        let floors = service();
        floors.set_floor(1, "A", 2, None).unwrap();
        floors.set_floor(1, "B", 2, None).unwrap();
        floors.set_floor(1, "C", 4, None).unwrap();

        assert_eq!(floors.floors(1).unwrap(), vec![2, 4]);
        let on_2 = floors.sections_on_floor(1, 2).unwrap();
        assert!(on_2.contains("A") && on_2.contains("B") && !on_2.contains("C"));

        assert_eq!(floors.remove_floor_config(1, "A").unwrap(), 1);
        assert_eq!(floors.floor_of(1, "A").unwrap(), 1);
        assert_eq!(floors.remove_all_floor_configs(1).unwrap(), 2);
        assert!(floors.floors(1).unwrap().is_empty());
    }

    #[test]
    fn coordinate_estimate_edges_read_as_floor_two() {
        let floors = service();
        // 1000 x 800 plan, 15% margin
        assert_eq!(floors.estimate_floor_by_coordinate(100.0, 400.0, 1000.0, 800.0), 2);
        assert_eq!(floors.estimate_floor_by_coordinate(900.0, 400.0, 1000.0, 800.0), 2);
        assert_eq!(floors.estimate_floor_by_coordinate(500.0, 700.0, 1000.0, 800.0), 2);
        assert_eq!(floors.estimate_floor_by_coordinate(500.0, 400.0, 1000.0, 800.0), 1);
        // unknown plan size falls back to the default floor
        assert_eq!(floors.estimate_floor_by_coordinate(0.0, 0.0, 0.0, 0.0), 1);
    }
}
