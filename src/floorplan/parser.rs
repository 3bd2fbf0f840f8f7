//! SVG floor plan parser.
//!
//! Transforms a vector floor plan into sections (closed polygon areas) and
//! facilities (point markers). Parsing is pure: the result bundle carries
//! everything a caller needs to persist or preview, and nothing is written
//! here.
//!
//! Error policy is two-tier: a document that is missing or not well-formed
//! markup fails as a whole, while individual malformed shapes inside a
//! well-formed document are skipped silently.

use std::collections::BTreeSet;

use log::{debug, trace};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::{centroid_of, PlanPoint};
use crate::error::{NavError, Result};
use crate::model::{Facility, FacilityKind, FloorAssignment, Section, SectionKind};
use crate::store::{FloorConfig, VenueStore};

use super::floors::{floor_from_containers, parse_floor_attr, split_floor_prefix};
use super::path_data::scan_path;

/// Identifiers that never become sections (decorative plan furniture).
const RESERVED_IDS: &[&str] = &["background", "bg", "base", "outline", "frame", "border", "plan"];

/// Pure result of parsing one floor plan document.
#[derive(Clone, Debug, Default)]
pub struct FloorPlanBundle {
    pub sections: Vec<Section>,
    pub facilities: Vec<Facility>,
    /// One proposed assignment per parsed section, for downstream persistence.
    pub proposed_assignments: Vec<FloorAssignment>,
    pub plan_width: f64,
    pub plan_height: f64,
}

/// Parse an SVG floor plan document for a venue.
///
/// `floors` supplies persisted floor assignments and the coordinate
/// estimator for the resolution chain; it is only read.
pub fn parse_floor_plan<S: VenueStore>(
    document: &str,
    venue_id: i64,
    floors: &FloorConfig<S>,
) -> Result<FloorPlanBundle> {
    if venue_id <= 0 {
        return Err(NavError::InvalidInput(format!(
            "venue id must be positive, got {venue_id}"
        )));
    }
    if document.trim().is_empty() {
        return Err(NavError::InvalidInput("missing floor plan document".into()));
    }

    let mut reader = Reader::from_reader(document.as_bytes());
    reader.config_mut().trim_text(true);

    let mut bundle = FloorPlanBundle::default();
    let mut group_stack: Vec<String> = Vec::new();
    let mut saw_svg_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"svg" => {
                    saw_svg_root = true;
                    read_plan_dimensions(e, &mut bundle)?;
                }
                b"g" => {
                    group_stack.push(attr(e, "id")?.unwrap_or_default());
                }
                b"path" => handle_path(e, venue_id, floors, &group_stack, &mut bundle)?,
                b"circle" | b"ellipse" => {
                    handle_marker(e, venue_id, floors, &group_stack, &mut bundle)?
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"svg" => {
                    saw_svg_root = true;
                    read_plan_dimensions(e, &mut bundle)?;
                }
                b"path" => handle_path(e, venue_id, floors, &group_stack, &mut bundle)?,
                b"circle" | b"ellipse" => {
                    handle_marker(e, venue_id, floors, &group_stack, &mut bundle)?
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"g" {
                    group_stack.pop();
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
        buf.clear();
    }

    if !saw_svg_root {
        return Err(NavError::Parse("document has no <svg> root".into()));
    }

    debug!(
        "[FloorPlan] venue {}: {} sections, {} facilities ({}x{})",
        venue_id,
        bundle.sections.len(),
        bundle.facilities.len(),
        bundle.plan_width,
        bundle.plan_height
    );
    Ok(bundle)
}

fn handle_path<S: VenueStore>(
    e: &BytesStart,
    venue_id: i64,
    floors: &FloorConfig<S>,
    group_stack: &[String],
    bundle: &mut FloorPlanBundle,
) -> Result<()> {
    let raw_id = match attr(e, "id")? {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Ok(()),
    };
    if RESERVED_IDS.iter().any(|r| raw_id.eq_ignore_ascii_case(r)) {
        trace!("[FloorPlan] skipping reserved id {:?}", raw_id);
        return Ok(());
    }

    let d = attr(e, "d")?.unwrap_or_default();
    let scan = scan_path(&d);
    let vertices: Vec<PlanPoint> = scan.vertices.iter().map(|v| v.rounded()).collect();
    if vertices.len() < 3 {
        trace!("[FloorPlan] skipping {:?}: {} vertices", raw_id, vertices.len());
        return Ok(());
    }

    let (prefix_floor, canonical_id) = split_floor_prefix(&raw_id);
    let kind = match attr(e, "data-type")? {
        Some(t) => SectionKind::from_keyword(&t),
        None => SectionKind::Unknown,
    };
    let explicit = attr(e, "data-floor")?.as_deref().and_then(parse_floor_attr);
    let centroid = centroid_of(&vertices);
    let floor = resolve_floor(
        floors,
        venue_id,
        explicit,
        group_stack,
        prefix_floor,
        canonical_id,
        centroid,
        bundle,
    )?;

    let section = match Section::new(venue_id, canonical_id, vertices, floor, kind) {
        Some(s) => s,
        // distinct-vertex check can still fail after rounding
        None => return Ok(()),
    };
    bundle
        .proposed_assignments
        .push(FloorAssignment::new(venue_id, canonical_id, floor));
    bundle.sections.push(section);
    Ok(())
}

fn handle_marker<S: VenueStore>(
    e: &BytesStart,
    venue_id: i64,
    floors: &FloorConfig<S>,
    group_stack: &[String],
    bundle: &mut FloorPlanBundle,
) -> Result<()> {
    let raw_id = match attr(e, "id")? {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Ok(()),
    };
    let name = decode_char_refs(&raw_id);

    let cx = attr(e, "cx")?.and_then(|v| v.trim().parse::<f64>().ok());
    let cy = attr(e, "cy")?.and_then(|v| v.trim().parse::<f64>().ok());
    let (cx, cy) = match (cx, cy) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            trace!("[FloorPlan] skipping marker {:?}: no coordinates", name);
            return Ok(());
        }
    };
    let coordinate = PlanPoint::new(cx, cy).rounded();

    // explicit type attribute first, then the fill-color convention
    let kind = match attr(e, "data-type")? {
        Some(t) => FacilityKind::from_keyword(&t),
        None => match attr(e, "fill")? {
            Some(fill) => FacilityKind::from_fill(&fill),
            None => FacilityKind::Other,
        },
    };

    let connected_floors = match attr(e, "data-floors")? {
        Some(list) => parse_floor_list(&list),
        None => BTreeSet::new(),
    };
    let connected_floors = if connected_floors.is_empty() && kind == FacilityKind::Stairs {
        Facility::default_stairs_floors()
    } else {
        connected_floors
    };

    let (prefix_floor, canonical_id) = split_floor_prefix(&name);
    let explicit = attr(e, "data-floor")?.as_deref().and_then(parse_floor_attr);
    let floor = resolve_floor(
        floors,
        venue_id,
        explicit,
        group_stack,
        prefix_floor,
        canonical_id,
        coordinate,
        bundle,
    )?;

    bundle.facilities.push(Facility {
        venue_id,
        facility_id: name.clone(),
        name,
        kind,
        coordinate,
        floor,
        connected_floors,
    });
    Ok(())
}

/// Ordered floor fallback chain; first match wins.
#[allow(clippy::too_many_arguments)]
fn resolve_floor<S: VenueStore>(
    floors: &FloorConfig<S>,
    venue_id: i64,
    explicit: Option<i32>,
    ancestors: &[String],
    prefix_floor: Option<i32>,
    canonical_id: &str,
    coordinate: PlanPoint,
    bundle: &FloorPlanBundle,
) -> Result<i32> {
    if let Some(floor) = explicit {
        return Ok(floor);
    }
    if let Some(floor) = floor_from_containers(ancestors) {
        return Ok(floor);
    }
    if let Some(floor) = prefix_floor {
        return Ok(floor);
    }
    if let Some(floor) = floors.explicit_floor(venue_id, canonical_id)? {
        return Ok(floor);
    }
    if bundle.plan_width > 0.0 && bundle.plan_height > 0.0 {
        return Ok(floors.estimate_floor_by_coordinate(
            coordinate.x,
            coordinate.y,
            bundle.plan_width,
            bundle.plan_height,
        ));
    }
    Ok(1)
}

fn read_plan_dimensions(e: &BytesStart, bundle: &mut FloorPlanBundle) -> Result<()> {
    let width = attr(e, "width")?.as_deref().and_then(parse_dimension);
    let height = attr(e, "height")?.as_deref().and_then(parse_dimension);
    match (width, height) {
        (Some(w), Some(h)) => {
            bundle.plan_width = w;
            bundle.plan_height = h;
        }
        _ => {
            // fall back to the viewBox extent
            if let Some(view_box) = attr(e, "viewBox")? {
                let nums: Vec<f64> = view_box
                    .split([' ', ','])
                    .filter(|t| !t.is_empty())
                    .filter_map(|t| t.parse().ok())
                    .collect();
                if nums.len() == 4 {
                    bundle.plan_width = nums[2];
                    bundle.plan_height = nums[3];
                }
            }
        }
    }
    Ok(())
}

/// Read and unescape one attribute.
fn attr(e: &BytesStart, name: &str) -> Result<Option<String>> {
    let attribute = e
        .try_get_attribute(name)
        .map_err(|err| NavError::Parse(err.to_string()))?;
    match attribute {
        Some(a) => {
            let value = a
                .unescape_value()
                .map_err(|err| NavError::Parse(err.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Length attribute with an optional unit suffix ("800", "800px").
fn parse_dimension(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse()
        .ok()
}

/// Comma-separated positive floor numbers ("1,3").
fn parse_floor_list(value: &str) -> BTreeSet<i32> {
    value
        .split(',')
        .filter_map(|t| t.trim().parse::<i32>().ok())
        .filter(|f| *f > 0)
        .collect()
}

/// Resolve numeric character references left in an attribute value after
/// XML unescaping (`&#44228;` or `&#xACC4;`). Unresolvable references are
/// kept verbatim.
pub fn decode_char_refs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end) => {
                let body = &tail[2..end];
                let code = match body.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => body.parse::<u32>().ok(),
                };
                match code.and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
