//! Collapse duplicate representations of the same physical place.
//!
//! Two passes. The identity pass runs before selection and keys on
//! kind + normalized name (or kind + cell when unnamed) so one place arriving
//! from two sources can't occupy two slots. The presentation pass runs after
//! selection as a final guard: equal names within ~180m never both reach the
//! user, even across kinds.

use std::collections::HashMap;

use meetspot_common::{haversine_meters, ScoredCandidate};

/// Distance under which same-named results are presentation duplicates.
pub const PRESENTATION_RADIUS_METERS: f64 = 180.0;

/// Lowercase, strip punctuation and apostrophes, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn identity_key(c: &ScoredCandidate) -> String {
    match c.name.as_deref().map(normalize_name) {
        Some(n) if !n.is_empty() => format!("{}|{n}", c.kind),
        _ => format!("{}|{}", c.kind, c.cell_id),
    }
}

/// Keep only the highest-scoring member of each identity group.
/// Preserves the relative order of the survivors.
pub fn dedupe_identity(candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut best: HashMap<String, usize> = HashMap::new();
    for (idx, c) in candidates.iter().enumerate() {
        let key = identity_key(c);
        match best.get(&key) {
            Some(&prev) if candidates[prev].score >= c.score => {}
            _ => {
                best.insert(key, idx);
            }
        }
    }
    let keep: Vec<usize> = {
        let mut v: Vec<usize> = best.into_values().collect();
        v.sort_unstable();
        v
    };
    let mut out = Vec::with_capacity(keep.len());
    for (idx, c) in candidates.into_iter().enumerate() {
        if keep.binary_search(&idx).is_ok() {
            out.push(c);
        }
    }
    out
}

/// Drop any later result whose normalized name equals an earlier one's and
/// whose distance to it is under the presentation threshold, kind ignored.
pub fn dedupe_presentation(results: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut kept: Vec<ScoredCandidate> = Vec::with_capacity(results.len());
    for candidate in results {
        let name = candidate.name.as_deref().map(normalize_name);
        let duplicate = match &name {
            Some(n) if !n.is_empty() => kept.iter().any(|k| {
                k.name.as_deref().map(normalize_name).as_deref() == Some(n.as_str())
                    && haversine_meters(k.lat, k.lon, candidate.lat, candidate.lon)
                        < PRESENTATION_RADIUS_METERS
            }),
            _ => false,
        };
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetspot_common::PlaceKind;

    fn scored(id: &str, kind: PlaceKind, name: Option<&str>, score: f64, lat: f64) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            kind,
            name: name.map(String::from),
            lat,
            lon: -93.265,
            score,
            distance_meters: 100.0,
            cell_id: format!("cell-{id}"),
            cameras_in_neighborhood: 0,
            cameras_in_cell: 0,
            report_yes: 0,
            report_no: 0,
            report_signage: 0,
            conflict: false,
            reasons: vec![],
            reported_place_name: None,
            reported_place_id: None,
            reported_place_source: None,
            reported_place_address: None,
            reported_details: None,
            rerank_reason: None,
        }
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_name("Joe's  Café!"), "joe s café");
        assert_eq!(normalize_name("  CORNER   cafe "), "corner cafe");
    }

    #[test]
    fn identity_keeps_highest_scorer() {
        let cands = vec![
            scored("a", PlaceKind::Cafe, Some("Corner Cafe"), 1.0, 44.9778),
            scored("b", PlaceKind::Cafe, Some("corner cafe!"), 2.0, 44.9779),
            scored("c", PlaceKind::Bank, Some("Corner Cafe"), 0.5, 44.9778),
        ];
        let out = dedupe_identity(cands);
        // Same kind + name collapse; different kind survives this pass
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|c| c.id == "b"));
        assert!(out.iter().any(|c| c.id == "c"));
    }

    #[test]
    fn unnamed_candidates_key_on_cell() {
        let mut a = scored("a", PlaceKind::CommunityHotspot, None, 1.0, 44.9778);
        let mut b = scored("b", PlaceKind::CommunityHotspot, None, 2.0, 44.9778);
        a.cell_id = "same".into();
        b.cell_id = "same".into();
        let out = dedupe_identity(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn presentation_drops_near_same_name_across_kinds() {
        // ~0.0009 deg lat ≈ 100m — inside the 180m presentation radius
        let cands = vec![
            scored("a", PlaceKind::Cafe, Some("Central Plaza"), 2.0, 44.9778),
            scored("b", PlaceKind::CommunityHotspot, Some("Central Plaza"), 1.0, 44.9787),
        ];
        let out = dedupe_presentation(cands);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn presentation_keeps_distant_same_name() {
        // ~1km apart: same chain name, different branches
        let cands = vec![
            scored("a", PlaceKind::Cafe, Some("Chain Coffee"), 2.0, 44.9778),
            scored("b", PlaceKind::Cafe, Some("Chain Coffee"), 1.0, 44.9868),
        ];
        let out = dedupe_presentation(cands);
        assert_eq!(out.len(), 2);
    }
}
