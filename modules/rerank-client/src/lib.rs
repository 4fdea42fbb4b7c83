//! HTTP client for the re-ranking collaborator.
//!
//! The collaborator receives an already-selected candidate list and the
//! user's request context, and replies with an ordering of the same ids plus
//! optional per-id reasons. This crate only moves bytes; contract
//! enforcement (reorder-only, unknown-id dropping) lives with the caller.

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One candidate as presented to the collaborator: just enough context to
/// reason about ordering, nothing it could use to fabricate results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RerankCandidate {
    pub id: String,
    pub kind: String,
    pub name: Option<String>,
    pub distance_meters: f64,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RerankRequest {
    pub candidates: Vec<RerankCandidate>,
    pub text: String,
    pub intent_label: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RerankResponse {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub reasons: std::collections::HashMap<String, String>,
}

pub struct RerankClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RerankClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))?,
            );
        }
        Ok(headers)
    }

    pub async fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse> {
        debug!(
            candidates = request.candidates.len(),
            intent = %request.intent_label,
            "Rerank request"
        );

        let response = self
            .http
            .post(&self.url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Rerank collaborator error ({status}): {error_text}"));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tolerates_missing_fields() {
        let parsed: RerankResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.order.is_empty());
        assert!(parsed.reasons.is_empty());

        let parsed: RerankResponse =
            serde_json::from_str(r#"{"order":["a","b"],"reasons":{"a":"lit"}}"#).unwrap();
        assert_eq!(parsed.order, vec!["a", "b"]);
        assert_eq!(parsed.reasons.get("a").map(String::as_str), Some("lit"));
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = RerankRequest {
            candidates: vec![RerankCandidate {
                id: "p1".into(),
                kind: "cafe".into(),
                name: Some("Corner Cafe".into()),
                distance_meters: 120.0,
                score: 1.5,
                reasons: vec![],
            }],
            text: "coffee".into(),
            intent_label: "first date".into(),
            lat: 44.9,
            lon: -93.2,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("intentLabel"));
        assert!(json.contains("distanceMeters"));
    }
}
