//! Explicit section→floor assignments.

use serde::{Deserialize, Serialize};

/// Lowest floor number accepted by the engine.
pub const MIN_FLOOR: i32 = 1;
/// Highest floor number accepted by the engine.
pub const MAX_FLOOR: i32 = 100;

/// A persisted mapping of a section to a floor number.
///
/// Unique per `(venue_id, section_id)`. Authoritative when present: the
/// coordinate estimator never overrides an explicit assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorAssignment {
    pub venue_id: i64,
    pub section_id: String,
    pub floor: i32,
    /// Optional administrative note
    pub description: Option<String>,
}

impl FloorAssignment {
    pub fn new(venue_id: i64, section_id: impl Into<String>, floor: i32) -> FloorAssignment {
        FloorAssignment {
            venue_id,
            section_id: section_id.into(),
            floor,
            description: None,
        }
    }
}
