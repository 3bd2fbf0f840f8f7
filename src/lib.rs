//! # Marga-Nav: Indoor Venue Navigation Engine
//!
//! A navigation engine for indoor venues: it ingests SVG floor plans,
//! extracts a semantic spatial model (obstacle polygons, points of
//! interest, floor assignment), and answers point-to-point pathfinding
//! queries that avoid obstacles and can cross floors through stairs and
//! elevators.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marga_nav::{parse_floor_plan, FloorConfig, MemoryVenueStore, Navigator, VenueStore};
//!
//! let store = Arc::new(MemoryVenueStore::new());
//! let floors = FloorConfig::new(store.clone());
//!
//! // Ingest a floor plan (pure: the bundle is yours to persist)
//! let svg = std::fs::read_to_string("venue.svg").unwrap();
//! let bundle = parse_floor_plan(&svg, 1, &floors).unwrap();
//! store.save_sections(&bundle.sections).unwrap();
//! store.save_facilities(&bundle.facilities).unwrap();
//!
//! // Route between two plan coordinates
//! let nav = Navigator::new(store);
//! let route = nav.find_path(1, 20.0, 30.0, 740.0, 410.0).unwrap();
//! println!("{} points, {} units", route.node_count, route.distance);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: geometry primitives ([`PlanPoint`], [`Polygon`], rounding)
//! - [`model`]: domain types (sections, facilities, assignments, routes)
//! - [`floorplan`]: SVG floor plan parsing
//! - [`store`]: the persistence seam ([`VenueStore`]) and the cached
//!   floor-assignment service ([`FloorConfig`])
//! - [`pathfinding`]: grid-discretized A* over polygon obstacles
//! - [`navigator`]: the query facade, including multi-floor composition
//!
//! ## Data Flow
//!
//! ```text
//! SVG document ──parse──▶ sections / facilities / proposed assignments
//!                                │ (caller persists via VenueStore)
//!                                ▼
//!                    FloorConfig (cached floor lookups)
//!                                │
//!                                ▼
//!      Navigator ──loads obstacles──▶ GridAStar ──▶ Route
//!              └── multi-floor: leg + FloorTransition + leg
//! ```
//!
//! Routes are pure query results: nothing about them is persisted, and an
//! empty route is the normal "no route found" answer rather than an error.

pub mod config;
pub mod core;
mod error;
pub mod floorplan;
pub mod model;
pub mod navigator;
pub mod pathfinding;
pub mod store;

pub use config::{AStarSettings, NavConfig, ParserSettings};
pub use core::{PlanPoint, Polygon};
pub use error::{NavError, Result};
pub use floorplan::{parse_floor_plan, FloorPlanBundle};
pub use model::{
    Facility, FacilityKind, FloorAssignment, FloorTransition, Route, Section, SectionKind,
};
pub use navigator::Navigator;
pub use store::{FloorConfig, MemoryVenueStore, VenueStore};
