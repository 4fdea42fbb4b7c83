//! Multi-signal candidate scoring.
//!
//! Each candidate gets a bounded score from distance falloff, nearby camera
//! density, attributed community reports, name/prompt matches, and a small
//! place-type nudge — plus human-readable reasons appended in a fixed
//! priority order so identical inputs reproduce identical output.

use std::collections::{HashMap, HashSet};

use h3o::CellIndex;

use meetspot_common::grid::{self, SCORING_RES};
use meetspot_common::{
    haversine_meters, PlaceCandidate, PlaceKind, ReportCellAggregate, ScoredCandidate,
};

use crate::intent::IntentConfig;

/// Everything the scorer needs beyond the candidate itself.
pub struct ScoreContext<'a> {
    pub user_lat: f64,
    pub user_lon: f64,
    /// The raw request text, lowercased, for prompt-mention matching.
    pub text_lower: &'a str,
    pub config: &'a IntentConfig,
    pub exclude: &'a HashSet<PlaceKind>,
    pub cameras_by_cell: &'a HashMap<CellIndex, u32>,
    pub reports_by_cell: &'a HashMap<CellIndex, &'a ReportCellAggregate>,
}

/// Score one candidate, or exclude it outright (excluded kind, out of range,
/// unusable coordinates).
pub fn score_candidate(
    candidate: &PlaceCandidate,
    ctx: &ScoreContext<'_>,
) -> Option<ScoredCandidate> {
    let tuning = &ctx.config.tuning;

    if ctx.exclude.contains(&candidate.kind) {
        return None;
    }

    let max_distance = ctx.config.max_distance_meters();
    let distance = haversine_meters(ctx.user_lat, ctx.user_lon, candidate.lat, candidate.lon);
    if !distance.is_finite() || distance > max_distance * tuning.distance_slack {
        return None;
    }

    let cell = grid::cell_at(candidate.lat, candidate.lon, SCORING_RES)?;
    let neighborhood = grid::disk(cell, 1);

    let cameras_in_cell = ctx.cameras_by_cell.get(&cell).copied().unwrap_or(0);
    let cameras_in_neighborhood: u32 = neighborhood
        .iter()
        .filter_map(|c| ctx.cameras_by_cell.get(c))
        .sum();

    // Community evidence: the candidate's own cell, or a borrowed neighbor
    // if its own cell is empty.
    let own_report = ctx.reports_by_cell.get(&cell).copied();
    let attributed = own_report.or_else(|| {
        borrow_neighbor_report(candidate, &neighborhood, cell, ctx, tuning.name_similarity_floor)
    });

    let (report_yes, report_no, report_signage) = attributed
        .map(|r| (r.yes_count, r.no_count, r.signage_count))
        .unwrap_or((0, 0, 0));
    let conflict = report_yes > 0 && report_no > 0;

    // --- Sub-scores ---

    let distance_score = (1.0 - distance / max_distance).clamp(0.0, 1.0);

    let camera_score = ((1.0 + cameras_in_neighborhood as f64).ln()
        / tuning.camera_saturation.ln())
    .clamp(0.0, 1.0);

    let community_score = tuning.yes_bonus(report_yes) - tuning.no_penalty(report_no)
        + tuning.signage_bonus(report_signage);

    let reported_name = attributed.and_then(|r| r.reported_place_name.as_deref());
    let name_sim = match (candidate.name.as_deref(), reported_name) {
        (Some(a), Some(b)) => name_similarity(a, b),
        _ => 0.0,
    };
    let name_match_boost = if reported_name.is_some() && name_sim >= tuning.name_match_strong {
        tuning.name_match_boost
    } else {
        0.0
    };
    // A different named place attached to the attributed cell argues against
    // this candidate owning the evidence.
    let name_mismatch_penalty =
        if reported_name.is_some() && name_sim < tuning.name_similarity_floor {
            tuning.name_mismatch_penalty
        } else {
            0.0
        };

    let prompt_mentioned = candidate
        .name
        .as_deref()
        .map(|n| prompt_mentions(ctx.text_lower, n, tuning.prompt_mention_min_token))
        .unwrap_or(false);
    let prompt_boost = if prompt_mentioned {
        tuning.prompt_mention_boost
    } else {
        0.0
    };

    let kind_weight = ctx.config.kind_weight(candidate.kind);
    let type_bonus = (kind_weight - tuning.type_neutral_weight) * tuning.type_bonus_factor;

    let conflict_penalty = if conflict { tuning.conflict_penalty } else { 0.0 };

    let weak_hotspot = candidate.kind == PlaceKind::CommunityHotspot
        && cameras_in_neighborhood == 0
        && report_yes < tuning.weak_hotspot_yes_floor;
    let weak_hotspot_penalty = if weak_hotspot {
        tuning.weak_hotspot_penalty
    } else {
        0.0
    };

    let score = tuning.distance_weight * distance_score
        + tuning.camera_weight * camera_score
        + community_score
        + name_match_boost
        + prompt_boost
        + type_bonus
        - name_mismatch_penalty
        - conflict_penalty
        - weak_hotspot_penalty;

    // --- Reasons, fixed priority order ---

    let mut reasons = Vec::new();
    if prompt_mentioned {
        reasons.push("mentioned in your request".to_string());
    }
    if name_match_boost > 0.0 {
        reasons.push("community reports name this place".to_string());
    } else if name_mismatch_penalty > 0.0 {
        reasons.push("nearby reports name a different place".to_string());
    }
    if kind_weight >= 0.7 {
        reasons.push(format!(
            "{} is a good fit for a {}",
            candidate.kind, ctx.config.label
        ));
    }
    match report_yes {
        n if n >= 6 => reasons.push(format!("repeatedly confirmed by community reports ({n})")),
        n if n >= 2 => reasons.push(format!("confirmed by community reports ({n})")),
        n if n >= 1 => reasons.push("one community report of cameras".to_string()),
        _ => {}
    }
    if report_no > 0 {
        reasons.push(format!("{report_no} report(s) of no cameras"));
    }
    match cameras_in_neighborhood {
        n if n >= 10 => reasons.push(format!("dense camera coverage nearby ({n})")),
        n if n >= 4 => reasons.push(format!("good camera coverage nearby ({n})")),
        n if n >= 1 => reasons.push(format!("some camera coverage nearby ({n})")),
        _ => {}
    }
    if report_signage > 0 {
        reasons.push("surveillance signage reported".to_string());
    }
    if conflict {
        reasons.push("conflicting community reports".to_string());
    }
    if weak_hotspot {
        reasons.push("limited independent evidence".to_string());
    }

    Some(ScoredCandidate {
        id: candidate.id.clone(),
        kind: candidate.kind,
        name: candidate.name.clone(),
        lat: candidate.lat,
        lon: candidate.lon,
        score,
        distance_meters: distance,
        cell_id: cell.to_string(),
        cameras_in_neighborhood,
        cameras_in_cell,
        report_yes,
        report_no,
        report_signage,
        conflict,
        reasons,
        reported_place_name: attributed.and_then(|r| r.reported_place_name.clone()),
        reported_place_id: attributed.and_then(|r| r.reported_place_id.clone()),
        reported_place_source: attributed.and_then(|r| r.reported_place_source.clone()),
        reported_place_address: attributed.and_then(|r| r.reported_place_address.clone()),
        reported_details: attributed.and_then(|r| r.reported_details.clone()),
        rerank_reason: None,
    })
}

/// Pick the best-evidence neighbor cell within the 1-ring, gated by a name
/// similarity check so evidence is never silently borrowed for an unrelated
/// place. The "best evidence" ranking sums yes+no+signage with equal weight.
fn borrow_neighbor_report<'a>(
    candidate: &PlaceCandidate,
    neighborhood: &[CellIndex],
    own_cell: CellIndex,
    ctx: &ScoreContext<'a>,
    similarity_floor: f64,
) -> Option<&'a ReportCellAggregate> {
    let candidate_name = candidate.name.as_deref()?;

    let best = neighborhood
        .iter()
        .filter(|c| **c != own_cell)
        .filter_map(|c| ctx.reports_by_cell.get(c).copied())
        .max_by_key(|r| r.yes_count + r.no_count + r.signage_count)?;

    let reported = best.reported_place_name.as_deref()?;
    if name_similarity(candidate_name, reported) >= similarity_floor {
        Some(best)
    } else {
        None
    }
}

/// Token-overlap / substring similarity in [0, 1].
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a_norm = crate::dedupe::normalize_name(a);
    let b_norm = crate::dedupe::normalize_name(b);
    if a_norm.is_empty() || b_norm.is_empty() {
        return 0.0;
    }
    if a_norm == b_norm || a_norm.contains(&b_norm) || b_norm.contains(&a_norm) {
        return 1.0;
    }
    let a_tokens: HashSet<&str> = a_norm.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b_norm.split_whitespace().collect();
    let common = a_tokens.intersection(&b_tokens).count();
    let smaller = a_tokens.len().min(b_tokens.len()).max(1);
    common as f64 / smaller as f64
}

/// Does the request text mention this candidate by name — the full name, or
/// any distinguishing token of at least `min_token` characters?
fn prompt_mentions(text_lower: &str, name: &str, min_token: usize) -> bool {
    let name_norm = crate::dedupe::normalize_name(name);
    if name_norm.is_empty() {
        return false;
    }
    if text_lower.contains(&name_norm) {
        return true;
    }
    name_norm
        .split_whitespace()
        .filter(|t| t.len() >= min_token)
        .any(|t| text_lower.contains(t))
}

/// Bucket raw camera points into scoring-resolution cells.
pub fn bucket_cameras(points: &[meetspot_common::CameraPoint]) -> HashMap<CellIndex, u32> {
    let mut cells: HashMap<CellIndex, u32> = HashMap::new();
    for p in points {
        if let Some(cell) = grid::cell_at(p.lat, p.lon, SCORING_RES) {
            *cells.entry(cell).or_default() += 1;
        }
    }
    cells
}

/// Index report aggregates by their parsed cell id. Unparseable ids are
/// dropped at this boundary so nothing unchecked reaches scoring.
pub fn index_reports<'a>(
    cells: &'a [ReportCellAggregate],
) -> HashMap<CellIndex, &'a ReportCellAggregate> {
    cells
        .iter()
        .filter_map(|agg| grid::parse_cell(&agg.cell_id).map(|c| (c, agg)))
        .collect()
}
