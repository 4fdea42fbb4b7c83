//! Final selection under the hotspot-diversity cap and evidence-priority
//! rule. Hotspots supplement a normal top-N; zero-signal places are a last
//! resort, never preferred over evidenced ones regardless of raw score ties.

use meetspot_common::{PlaceKind, ScoredCandidate};

pub struct Selection {
    pub results: Vec<ScoredCandidate>,
    pub note: String,
}

/// How many hotspot slots a result list of this size may spend.
pub fn hotspot_cap(max_results: usize) -> usize {
    2.min(max_results.div_ceil(3))
}

fn has_evidence(c: &ScoredCandidate) -> bool {
    c.cameras_in_neighborhood > 0 || c.report_yes > 0 || c.report_signage > 0
}

/// Pick the final ordered, capped result set.
///
/// `candidates` must already be deduped and sorted by score descending.
/// When the caller excluded every real place kind the hotspots-only branch
/// (or an annotated empty result) is returned instead of a degraded normal
/// list.
pub fn select(
    candidates: Vec<ScoredCandidate>,
    max_results: usize,
    hotspots_enabled: bool,
    all_real_excluded: bool,
) -> Selection {
    if all_real_excluded {
        if !hotspots_enabled {
            return Selection {
                results: Vec::new(),
                note: "No results: every place type was excluded.".to_string(),
            };
        }
        let results: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|c| c.kind == PlaceKind::CommunityHotspot)
            .take(max_results)
            .collect();
        return Selection {
            results,
            note: "Showing community hotspots only: all place types were excluded.".to_string(),
        };
    }

    let (hotspots, places): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.kind == PlaceKind::CommunityHotspot);
    let (evidenced, bare): (Vec<_>, Vec<_>) = places.into_iter().partition(has_evidence);

    let mut results: Vec<ScoredCandidate> = Vec::with_capacity(max_results);
    results.extend(hotspots.into_iter().take(hotspot_cap(max_results)));
    for c in evidenced.into_iter().chain(bare) {
        if results.len() >= max_results {
            break;
        }
        results.push(c);
    }
    results.truncate(max_results);

    Selection {
        results,
        note: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, kind: PlaceKind, score: f64, yes: u32, cameras: u32) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            kind,
            name: Some(id.to_string()),
            lat: 44.9778,
            lon: -93.265,
            score,
            distance_meters: 100.0,
            cell_id: format!("cell-{id}"),
            cameras_in_neighborhood: cameras,
            cameras_in_cell: cameras,
            report_yes: yes,
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
    fn hotspot_cap_scales_with_max_results() {
        assert_eq!(hotspot_cap(1), 1);
        assert_eq!(hotspot_cap(3), 1);
        assert_eq!(hotspot_cap(5), 2);
        assert_eq!(hotspot_cap(30), 2);
    }

    #[test]
    fn hotspots_cannot_crowd_out_places() {
        let candidates = vec![
            scored("h1", PlaceKind::CommunityHotspot, 5.0, 6, 0),
            scored("h2", PlaceKind::CommunityHotspot, 4.0, 4, 0),
            scored("h3", PlaceKind::CommunityHotspot, 3.5, 3, 0),
            scored("p1", PlaceKind::Cafe, 3.0, 2, 1),
            scored("p2", PlaceKind::Bank, 2.0, 0, 2),
        ];
        let sel = select(candidates, 4, true, false);
        let hotspot_count = sel
            .results
            .iter()
            .filter(|c| c.kind == PlaceKind::CommunityHotspot)
            .count();
        assert_eq!(hotspot_count, 2);
        assert_eq!(sel.results.len(), 4);
        assert!(sel.note.is_empty());
    }

    #[test]
    fn evidence_beats_raw_score_among_places() {
        let candidates = vec![
            scored("bare", PlaceKind::Cafe, 3.0, 0, 0),
            scored("evidenced", PlaceKind::Bank, 2.0, 2, 0),
        ];
        let sel = select(candidates, 1, true, false);
        assert_eq!(sel.results[0].id, "evidenced");
    }

    #[test]
    fn hotspots_only_branch_has_note_and_no_places() {
        let candidates = vec![
            scored("h1", PlaceKind::CommunityHotspot, 5.0, 6, 0),
            scored("p1", PlaceKind::Cafe, 4.0, 2, 1),
        ];
        let sel = select(candidates, 5, true, true);
        assert_eq!(sel.results.len(), 1);
        assert_eq!(sel.results[0].kind, PlaceKind::CommunityHotspot);
        assert!(sel.note.contains("hotspots only"));
    }

    #[test]
    fn everything_excluded_is_annotated_empty() {
        let sel = select(vec![], 5, false, true);
        assert!(sel.results.is_empty());
        assert!(sel.note.contains("No results"));
    }

    #[test]
    fn stops_when_inputs_exhausted() {
        let candidates = vec![scored("p1", PlaceKind::Cafe, 1.0, 1, 0)];
        let sel = select(candidates, 10, true, false);
        assert_eq!(sel.results.len(), 1);
    }
}
