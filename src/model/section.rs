//! Venue sections: closed polygon areas extracted from the floor plan.

use serde::{Deserialize, Serialize};

use crate::core::{centroid_of, PlanPoint, Polygon};

/// Semantic section type - what kind of area does this ring enclose?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SectionKind {
    /// Seating block
    Seat,
    /// Stage or performance area
    Stage,
    /// Structural wall
    Wall,
    /// Entrance area
    Entrance,
    /// Exit area
    Exit,
    /// Walkable corridor
    Corridor,
    /// Unclassified area
    #[default]
    Unknown,
}

impl SectionKind {
    /// Resolve a kind from a type keyword (attribute value or id fragment).
    pub fn from_keyword(keyword: &str) -> SectionKind {
        match keyword.to_ascii_lowercase().as_str() {
            "seat" | "seats" => SectionKind::Seat,
            "stage" => SectionKind::Stage,
            "wall" => SectionKind::Wall,
            "entrance" => SectionKind::Entrance,
            "exit" => SectionKind::Exit,
            "corridor" | "aisle" => SectionKind::Corridor,
            _ => SectionKind::Unknown,
        }
    }

    /// Can a route pass through this area? Corridors and entrance/exit
    /// areas are walkable; every other ring blocks pathfinding.
    #[inline]
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            SectionKind::Corridor | SectionKind::Entrance | SectionKind::Exit
        )
    }
}

/// A closed polygon area of a venue floor plan.
///
/// The parser guarantees `vertices` holds at least 3 distinct points; rings
/// that fail that invariant never become sections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Owning venue
    pub venue_id: i64,
    /// Stable identifier, unique within the venue
    pub section_id: String,
    /// Open vertex ring (closing duplicate stripped)
    pub vertices: Vec<PlanPoint>,
    /// Arithmetic-mean centroid, 1 decimal place
    pub centroid: PlanPoint,
    /// Resolved floor number
    pub floor: i32,
    /// Semantic type
    pub kind: SectionKind,
}

impl Section {
    /// Build a section, deriving the centroid from the vertex ring.
    ///
    /// Returns `None` when the ring has fewer than 3 distinct vertices.
    pub fn new(
        venue_id: i64,
        section_id: impl Into<String>,
        vertices: Vec<PlanPoint>,
        floor: i32,
        kind: SectionKind,
    ) -> Option<Section> {
        Polygon::new(&vertices)?;
        let centroid = centroid_of(&vertices);
        Some(Section {
            venue_id,
            section_id: section_id.into(),
            vertices,
            centroid,
            floor,
            kind,
        })
    }

    /// The section's ring as a closed polygon.
    pub fn polygon(&self) -> Option<Polygon> {
        Polygon::new(&self.vertices)
    }

    /// Does this section block pathfinding?
    #[inline]
    pub fn is_obstacle(&self) -> bool {
        !self.kind.is_passable()
    }
}
