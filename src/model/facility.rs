//! Point facilities: restrooms, offices, stores, stairs, elevators.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::PlanPoint;

/// Fill-color convention for circular plan markers. Only stairs blue is
/// fixed by the document format; the rest is this crate's convention.
const FILL_TABLE: &[(&str, FacilityKind)] = &[
    ("#006AFF", FacilityKind::Stairs),
    ("#9B51E0", FacilityKind::Elevator),
    ("#00B050", FacilityKind::Toilet),
    ("#7030A0", FacilityKind::VipToilet),
    ("#828282", FacilityKind::Office),
    ("#F2C94C", FacilityKind::Store),
    ("#27AE60", FacilityKind::Entrance),
    ("#EB5757", FacilityKind::Exit),
];

/// Semantic facility type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FacilityKind {
    Toilet,
    VipToilet,
    Office,
    Store,
    Stairs,
    Elevator,
    Entrance,
    Exit,
    /// Unclassified point of interest
    #[default]
    Other,
}

impl FacilityKind {
    /// Resolve a kind from an explicit type keyword.
    pub fn from_keyword(keyword: &str) -> FacilityKind {
        match keyword.to_ascii_lowercase().as_str() {
            "toilet" | "restroom" | "wc" => FacilityKind::Toilet,
            "vip_toilet" | "vip-toilet" | "viptoilet" => FacilityKind::VipToilet,
            "office" => FacilityKind::Office,
            "store" | "shop" => FacilityKind::Store,
            "stairs" | "stair" | "staircase" => FacilityKind::Stairs,
            "elevator" | "lift" => FacilityKind::Elevator,
            "entrance" => FacilityKind::Entrance,
            "exit" => FacilityKind::Exit,
            _ => FacilityKind::Other,
        }
    }

    /// Resolve a kind from a marker fill color (`#RRGGBB`, case-insensitive).
    pub fn from_fill(fill: &str) -> FacilityKind {
        let fill = fill.trim();
        FILL_TABLE
            .iter()
            .find(|(hex, _)| hex.eq_ignore_ascii_case(fill))
            .map(|(_, kind)| *kind)
            .unwrap_or(FacilityKind::Other)
    }

    /// Can this facility move a route between floors?
    #[inline]
    pub fn is_floor_transition(self) -> bool {
        matches!(self, FacilityKind::Stairs | FacilityKind::Elevator)
    }
}

/// A point feature of a venue floor plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Owning venue
    pub venue_id: i64,
    /// Identifier, unique within the venue's plan
    pub facility_id: String,
    /// Decoded display name
    pub name: String,
    /// Semantic type
    pub kind: FacilityKind,
    /// Marker coordinate
    pub coordinate: PlanPoint,
    /// Resolved floor number
    pub floor: i32,
    /// Floors reachable through this facility. Populated for
    /// floor-transition kinds; stairs without declared connectivity
    /// default to {1, 2}.
    pub connected_floors: BTreeSet<i32>,
}

impl Facility {
    /// Default connectivity for a stairs facility with no declared floors.
    pub fn default_stairs_floors() -> BTreeSet<i32> {
        BTreeSet::from([1, 2])
    }

    /// Whether this facility can carry a route from `from` to `to`.
    pub fn connects(&self, from: i32, to: i32) -> bool {
        self.kind.is_floor_transition()
            && self.connected_floors.contains(&from)
            && self.connected_floors.contains(&to)
    }
}
