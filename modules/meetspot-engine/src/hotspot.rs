//! Merge fine-grained report cells into coarser "community hotspot"
//! pseudo-places.
//!
//! Algorithm:
//! 1. Drop cells with fewer than 2 yes-reports (single-report noise floor)
//! 2. Group survivors by their parent cell one resolution coarser
//! 3. Place each hotspot at the center of the group's best child cell —
//!    not the parent centroid, so the marker sits on the strongest concrete
//!    evidence instead of an averaged point on an unrelated building
//! 4. Name from the best child's reported place name, else a confidence label
//! 5. Drop hotspots beyond the intent radius (plus slack)

use std::collections::HashMap;

use h3o::CellIndex;
use tracing::debug;

use meetspot_common::grid::{self, HOTSPOT_PARENT_RES, REPORT_CELL_RES};
use meetspot_common::{haversine_meters, PlaceCandidate, PlaceKind, ReportCellAggregate};

/// Minimum yes-reports for a cell to contribute to any hotspot.
pub const MIN_CELL_YES: u32 = 2;

/// Group yes-sum at which a hotspot counts as community-confirmed.
pub const CONFIRMED_YES_SUM: u32 = 5;

struct HotspotGroup<'a> {
    yes_sum: u32,
    best_child: CellIndex,
    best_child_agg: &'a ReportCellAggregate,
    best_child_yes: u32,
}

/// Build synthetic hotspot candidates from report-cell aggregates.
/// Hotspot ids derive from the parent cell id, so repeated requests over
/// stable data produce stable identities.
pub fn build_hotspots(
    cells: &[ReportCellAggregate],
    user_lat: f64,
    user_lon: f64,
    max_distance_meters: f64,
    distance_slack: f64,
) -> Vec<PlaceCandidate> {
    let mut groups: HashMap<CellIndex, HotspotGroup<'_>> = HashMap::new();

    for agg in cells {
        if agg.yes_count < MIN_CELL_YES {
            continue;
        }
        let Some(cell) = grid::parse_cell(&agg.cell_id) else {
            debug!(cell_id = %agg.cell_id, "Skipping unparseable report cell id");
            continue;
        };
        if cell.resolution() != REPORT_CELL_RES {
            debug!(cell_id = %agg.cell_id, "Skipping report cell at unexpected resolution");
            continue;
        }
        let Some(parent) = grid::parent(cell, HOTSPOT_PARENT_RES) else {
            continue;
        };

        groups
            .entry(parent)
            .and_modify(|g| {
                g.yes_sum += agg.yes_count;
                // Ties keep the first-encountered child; input iteration
                // order decides, which is not semantically defined.
                if agg.yes_count > g.best_child_yes {
                    g.best_child = cell;
                    g.best_child_agg = agg;
                    g.best_child_yes = agg.yes_count;
                }
            })
            .or_insert(HotspotGroup {
                yes_sum: agg.yes_count,
                best_child: cell,
                best_child_agg: agg,
                best_child_yes: agg.yes_count,
            });
    }

    let mut hotspots: Vec<PlaceCandidate> = groups
        .into_iter()
        .filter_map(|(parent, group)| {
            let (lat, lon) = grid::center(group.best_child);
            let distance = haversine_meters(user_lat, user_lon, lat, lon);
            if distance > max_distance_meters * distance_slack {
                return None;
            }
            let name = match &group.best_child_agg.reported_place_name {
                Some(n) if !n.trim().is_empty() => n.clone(),
                _ if group.yes_sum >= CONFIRMED_YES_SUM => {
                    "Community confirmed spot".to_string()
                }
                _ => "Community reported spot".to_string(),
            };
            Some(PlaceCandidate {
                id: format!("hotspot-{parent}"),
                kind: PlaceKind::CommunityHotspot,
                name: Some(name),
                lat,
                lon,
            })
        })
        .collect();

    // Deterministic output order for stable downstream iteration
    hotspots.sort_by(|a, b| a.id.cmp(&b.id));
    hotspots
}
