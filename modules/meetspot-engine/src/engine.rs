//! Request orchestration.
//!
//! classify → derive bbox/config → fetch the three sources concurrently →
//! build hotspots → score everything → dedupe → select → rerank
//! (best-effort) → cache → respond. Every external call is attempted once;
//! a failed or slow source degrades to an empty set, never to an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use meetspot_common::grid::REPORT_CELL_RES;
use meetspot_common::{
    BoundingBox, MeetSpotError, PlaceKind, Recommendation, RecommendRequest, ResponseMeta,
    ScoredCandidate,
};

use crate::cache::{cache_key, ResponseCache};
use crate::dedupe::{dedupe_identity, dedupe_presentation};
use crate::hotspot::build_hotspots;
use crate::intent::{classify, IntentConfig};
use crate::rerank::{rerank_best_effort, Reranker};
use crate::scorer::{bucket_cameras, index_reports, score_candidate, ScoreContext};
use crate::select::select;
use crate::traits::{CameraSource, PlaceSource, ReportCellSource};

/// Shared budget for the three-way evidence fan-out.
pub const FETCH_BUDGET: Duration = Duration::from_secs(12);

/// Free text beyond this many characters is truncated.
pub const MAX_TEXT_CHARS: usize = 800;

pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const MAX_MAX_RESULTS: u32 = 30;

/// Central dependency container for the engine.
#[derive(Clone)]
pub struct EngineDeps {
    pub places: Arc<dyn PlaceSource>,
    pub cameras: Arc<dyn CameraSource>,
    pub reports: Arc<dyn ReportCellSource>,
    pub reranker: Option<Arc<dyn Reranker>>,
    pub cache: Arc<dyn ResponseCache>,
}

pub struct RecommendEngine {
    deps: EngineDeps,
}

impl RecommendEngine {
    pub fn new(deps: EngineDeps) -> Self {
        Self { deps }
    }

    /// Produce a ranked, deduplicated, bounded recommendation list.
    pub async fn recommend(&self, req: RecommendRequest) -> Result<Recommendation> {
        if !(-90.0..=90.0).contains(&req.lat) || !(-180.0..=180.0).contains(&req.lon) {
            return Err(MeetSpotError::Validation("lat/lon out of range".to_string()).into());
        }

        let text: String = req.text.chars().take(MAX_TEXT_CHARS).collect();
        let text_lower = text.to_lowercase();

        let intent = classify(&text);
        let config = IntentConfig::for_intent(intent);

        let exclude: HashSet<PlaceKind> = req
            .exclude_kinds
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|s| PlaceKind::from_str_loose(s))
            .collect();
        let hotspots_enabled = !exclude.contains(&PlaceKind::CommunityHotspot);
        let all_real_excluded = PlaceKind::all_real().iter().all(|k| exclude.contains(k));

        let max_results = req
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_MAX_RESULTS) as usize;

        let bbox = BoundingBox::around(req.lat, req.lon, config.search_radius_meters);

        let mut excluded_sorted: Vec<PlaceKind> = exclude.iter().copied().collect();
        excluded_sorted.sort_by_key(|k| k.to_string());
        let key = cache_key(intent, req.lat, req.lon, max_results, &excluded_sorted, &text);
        if let Some(payload) = self.deps.cache.get(&key).await {
            debug!(key = %key, "Cache hit, replaying stored response");
            return Ok(serde_json::from_value(payload)?);
        }

        // Fan out to the three sources under one budget. Any failure or
        // timeout degrades that source to an empty set.
        let query_kinds: Vec<PlaceKind> = config
            .query_kinds
            .iter()
            .copied()
            .filter(|k| !exclude.contains(k))
            .collect();
        let (places_r, cameras_r, reports_r) = tokio::join!(
            tokio::time::timeout(FETCH_BUDGET, self.deps.places.fetch_places(&bbox, &query_kinds)),
            tokio::time::timeout(FETCH_BUDGET, self.deps.cameras.fetch_camera_points(&bbox)),
            tokio::time::timeout(
                FETCH_BUDGET,
                self.deps.reports.fetch_report_cells(&bbox, REPORT_CELL_RES)
            ),
        );
        let places = unwrap_or_empty("places", places_r);
        let camera_points = unwrap_or_empty("cameras", cameras_r);
        let report_cells = unwrap_or_empty("report_cells", reports_r);

        let cameras_by_cell = bucket_cameras(&camera_points);
        let reports_by_cell = index_reports(&report_cells);

        let hotspots = build_hotspots(
            &report_cells,
            req.lat,
            req.lon,
            config.max_distance_meters(),
            config.tuning.distance_slack,
        );

        let ctx = ScoreContext {
            user_lat: req.lat,
            user_lon: req.lon,
            text_lower: &text_lower,
            config: &config,
            exclude: &exclude,
            cameras_by_cell: &cameras_by_cell,
            reports_by_cell: &reports_by_cell,
        };
        let mut scored: Vec<ScoredCandidate> = places
            .iter()
            .chain(hotspots.iter())
            .filter_map(|c| score_candidate(c, &ctx))
            .collect();
        let candidates_scored = scored.len();

        scored = dedupe_identity(scored);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let selection = select(scored, max_results, hotspots_enabled, all_real_excluded);

        let (mut results, reranked) = match &self.deps.reranker {
            Some(reranker) => {
                rerank_best_effort(
                    reranker.as_ref(),
                    selection.results,
                    &text,
                    config.label,
                    req.lat,
                    req.lon,
                )
                .await
            }
            None => (selection.results, false),
        };
        results = dedupe_presentation(results);

        let recommendation = Recommendation {
            intent,
            intent_label: config.label.to_string(),
            bbox: bbox.to_string(),
            results,
            meta: ResponseMeta {
                places_fetched: places.len(),
                cameras_fetched: camera_points.len(),
                report_cells_fetched: report_cells.len(),
                hotspots_built: hotspots.len(),
                candidates_scored,
                reranked,
            },
            note: selection.note,
        };

        self.deps
            .cache
            .set(key, serde_json::to_value(&recommendation)?)
            .await;

        info!(
            intent = %intent,
            results = recommendation.results.len(),
            reranked,
            "Recommendation computed"
        );
        Ok(recommendation)
    }
}

fn unwrap_or_empty<T>(
    source: &str,
    outcome: Result<Result<Vec<T>>, tokio::time::error::Elapsed>,
) -> Vec<T> {
    match outcome {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => {
            warn!(source, error = %e, "Source failed, degrading to empty");
            Vec::new()
        }
        Err(_) => {
            warn!(source, "Source timed out, degrading to empty");
            Vec::new()
        }
    }
}
