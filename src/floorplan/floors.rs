//! Floor resolution rules applied during floor plan parsing.
//!
//! An element's floor is resolved by an ordered fallback chain (first
//! match wins):
//!
//! 1. explicit `data-floor` attribute
//! 2. nearest ancestor container whose id names a floor ("floor-2", "2f")
//! 3. floor-prefix naming convention on the element's own id (`2F-hall`)
//! 4. persisted explicit floor assignment
//! 5. coordinate estimation against the plan dimensions
//! 6. floor 1
//!
//! Rules 1–3 live here; the parser supplies 4–6.

/// Parse a positive floor number from an attribute value.
pub fn parse_floor_attr(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|f| *f > 0)
}

/// Floor named by the nearest ancestor container id, innermost first.
///
/// Matches ids containing `floor-N` / `floor_N` / `floorN` (case
/// insensitive) and ids that are exactly `Nf`.
pub fn floor_from_containers(ancestor_ids: &[String]) -> Option<i32> {
    ancestor_ids.iter().rev().find_map(|id| container_floor(id))
}

fn container_floor(id: &str) -> Option<i32> {
    let lower = id.trim().to_ascii_lowercase();
    if let Some(idx) = lower.find("floor") {
        let rest = lower[idx + "floor".len()..]
            .trim_start_matches(['-', '_', ' ']);
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Some(floor) = digits.parse::<i32>().ok().filter(|f| *f > 0) {
            return Some(floor);
        }
    }
    // whole id of the form "2f"
    if let Some(stripped) = lower.strip_suffix('f') {
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            return stripped.parse::<i32>().ok().filter(|f| *f > 0);
        }
    }
    None
}

/// Split a floor-prefixed identifier: `2F-hall` → `(Some(2), "hall")`.
///
/// The prefix is one or more digits, an `F`/`f`, and a separator; the
/// remainder is the canonical section id. Ids without the prefix come
/// back unchanged.
pub fn split_floor_prefix(id: &str) -> (Option<i32>, &str) {
    let digits_end = id.find(|c: char| !c.is_ascii_digit()).unwrap_or(id.len());
    if digits_end == 0 {
        return (None, id);
    }
    let rest = &id[digits_end..];
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some('F') | Some('f'), Some('-') | Some('_')) => {
            let canonical = &rest[2..];
            if canonical.is_empty() {
                return (None, id);
            }
            let floor = id[..digits_end].parse::<i32>().ok().filter(|f| *f > 0);
            match floor {
                Some(f) => (Some(f), canonical),
                None => (None, id),
            }
        }
        _ => (None, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_parsing_rejects_non_positive() {
        assert_eq!(parse_floor_attr("3"), Some(3));
        assert_eq!(parse_floor_attr(" 2 "), Some(2));
        assert_eq!(parse_floor_attr("0"), None);
        assert_eq!(parse_floor_attr("-1"), None);
        assert_eq!(parse_floor_attr("x"), None);
    }

    #[test]
    fn container_ids_name_floors() {
        let stack = vec!["plan".to_owned(), "floor-2".to_owned()];
        assert_eq!(floor_from_containers(&stack), Some(2));

        let stack = vec!["Floor_3".to_owned()];
        assert_eq!(floor_from_containers(&stack), Some(3));

        let stack = vec!["2f".to_owned()];
        assert_eq!(floor_from_containers(&stack), Some(2));

        let stack = vec!["decor".to_owned()];
        assert_eq!(floor_from_containers(&stack), None);
    }

    #[test]
    fn innermost_container_wins() {
        let stack = vec!["floor-1".to_owned(), "floor-2".to_owned()];
        assert_eq!(floor_from_containers(&stack), Some(2));
    }

    #[test]
    fn floor_prefix_splits_canonical_id() {
        assert_eq!(split_floor_prefix("2F-hall"), (Some(2), "hall"));
        assert_eq!(split_floor_prefix("10f_A"), (Some(10), "A"));
        assert_eq!(split_floor_prefix("hall"), (None, "hall"));
        assert_eq!(split_floor_prefix("2F-"), (None, "2F-"));
        assert_eq!(split_floor_prefix("2Fhall"), (None, "2Fhall"));
        assert_eq!(split_floor_prefix(""), (None, ""));
    }
}
