//! Floor plan ingestion: SVG document → sections, facilities, proposed
//! floor assignments.

mod floors;
mod parser;
mod path_data;

pub use parser::{decode_char_refs, parse_floor_plan, FloorPlanBundle};
pub use path_data::{scan_path, PathScan};
