//! Seams to the three external evidence sources.
//!
//! Each source is expected to return an empty collection when it has nothing
//! to offer; the engine treats "unreachable" and "empty" identically by
//! degrading to an empty set at the call site.

use anyhow::Result;
use async_trait::async_trait;
use h3o::Resolution;
use meetspot_common::{BoundingBox, CameraPoint, PlaceCandidate, ReportCellAggregate};

/// Serves known places of the requested kinds inside a bounding box.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn fetch_places(
        &self,
        bbox: &BoundingBox,
        kinds: &[meetspot_common::PlaceKind],
    ) -> Result<Vec<PlaceCandidate>>;
}

/// Serves raw map-derived camera points inside a bounding box.
/// Points are unindexed; the engine buckets them into grid cells itself.
#[async_trait]
pub trait CameraSource: Send + Sync {
    async fn fetch_camera_points(&self, bbox: &BoundingBox) -> Result<Vec<CameraPoint>>;
}

/// Serves per-cell community report aggregates at a fixed fine resolution.
#[async_trait]
pub trait ReportCellSource: Send + Sync {
    async fn fetch_report_cells(
        &self,
        bbox: &BoundingBox,
        resolution: Resolution,
    ) -> Result<Vec<ReportCellAggregate>>;
}
