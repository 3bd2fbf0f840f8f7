//! Domain types: sections, facilities, floor assignments, routes.

mod facility;
mod floor;
mod route;
mod section;

pub use facility::{Facility, FacilityKind};
pub use floor::{FloorAssignment, MAX_FLOOR, MIN_FLOOR};
pub use route::{FloorTransition, Route};
pub use section::{Section, SectionKind};
