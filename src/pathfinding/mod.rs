//! Same-floor pathfinding over polygon obstacle sets.

mod astar;

pub use astar::GridAStar;
