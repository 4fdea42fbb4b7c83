//! Typed clients for the external data endpoints, plus the wrapper that
//! plugs the rerank client into the engine's trait.
//!
//! Responses are validated and coerced into the shared entity types at this
//! boundary; nothing unchecked flows into scoring. An unreachable
//! collaborator surfaces here as an error, which the engine degrades to the
//! same empty set an empty body would produce.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use h3o::Resolution;
use tracing::debug;

use meetspot_common::{
    BoundingBox, CameraPoint, MeetSpotError, PlaceCandidate, PlaceKind, ReportCellAggregate,
    ScoredCandidate,
};
use meetspot_engine::{CameraSource, PlaceSource, ReportCellSource, Reranker, RerankOutcome};
use rerank_client::{RerankCandidate, RerankClient, RerankRequest};

#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl DataApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{path_and_query}", self.base_url);
        debug!(url = %url, "Data API request");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(
                MeetSpotError::Upstream(format!("{} from {url}", response.status())).into(),
            );
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlaceSource for DataApiClient {
    async fn fetch_places(
        &self,
        bbox: &BoundingBox,
        kinds: &[PlaceKind],
    ) -> Result<Vec<PlaceCandidate>> {
        let kinds_param = kinds
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.get_json(&format!("/api/places?bbox={bbox}&kinds={kinds_param}"))
            .await
    }
}

#[async_trait]
impl CameraSource for DataApiClient {
    async fn fetch_camera_points(&self, bbox: &BoundingBox) -> Result<Vec<CameraPoint>> {
        self.get_json(&format!("/api/cameras?bbox={bbox}")).await
    }
}

#[async_trait]
impl ReportCellSource for DataApiClient {
    async fn fetch_report_cells(
        &self,
        bbox: &BoundingBox,
        resolution: Resolution,
    ) -> Result<Vec<ReportCellAggregate>> {
        self.get_json(&format!(
            "/api/report-cells?bbox={bbox}&res={}",
            u8::from(resolution)
        ))
        .await
    }
}

/// Wrapper to make RerankClient implement the engine's dyn-compatible
/// Reranker trait.
pub struct HttpReranker {
    client: Arc<RerankClient>,
}

impl HttpReranker {
    pub fn new(client: Arc<RerankClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reranker for HttpReranker {
    async fn rerank(
        &self,
        candidates: &[ScoredCandidate],
        text: &str,
        intent_label: &str,
        lat: f64,
        lon: f64,
    ) -> Result<RerankOutcome> {
        let request = RerankRequest {
            candidates: candidates
                .iter()
                .map(|c| RerankCandidate {
                    id: c.id.clone(),
                    kind: c.kind.to_string(),
                    name: c.name.clone(),
                    distance_meters: c.distance_meters,
                    score: c.score,
                    reasons: c.reasons.clone(),
                })
                .collect(),
            text: text.to_string(),
            intent_label: intent_label.to_string(),
            lat,
            lon,
        };
        let response = self.client.rerank(&request).await?;
        Ok(RerankOutcome {
            order: response.order,
            reasons: response.reasons,
        })
    }
}
