//! Advisory re-ranking with a strict reorder-only contract.
//!
//! The collaborator may only permute the candidate ids it was given. Ids it
//! invents are dropped, ids it omits are appended in their original relative
//! order, and any failure — timeout, transport error, garbage output — falls
//! back to the pre-rerank order. None of this is ever surfaced as an error.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use meetspot_common::ScoredCandidate;

/// The collaborator call is raced against this budget.
pub const RERANK_TIMEOUT: Duration = Duration::from_secs(6);

/// At most this many candidates are sent to the collaborator.
pub const RERANK_MAX_CANDIDATES: usize = 25;

/// What a reranker returns: a permutation of the input id set plus optional
/// short per-id reasons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RerankOutcome {
    pub order: Vec<String>,
    #[serde(default)]
    pub reasons: HashMap<String, String>,
}

#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        candidates: &[ScoredCandidate],
        text: &str,
        intent_label: &str,
        lat: f64,
        lon: f64,
    ) -> Result<RerankOutcome>;
}

/// Enforce the reorder-only contract on a collaborator response.
///
/// Unknown ids are silently dropped, repeats are ignored, and input ids
/// missing from the returned order are appended at the end in their original
/// relative order. Reasons attach only to ids from the input set.
pub fn apply_rerank(selected: Vec<ScoredCandidate>, outcome: RerankOutcome) -> Vec<ScoredCandidate> {
    let mut by_id: HashMap<String, ScoredCandidate> = selected
        .iter()
        .map(|c| (c.id.clone(), c.clone()))
        .collect();
    let original_order: Vec<String> = selected.iter().map(|c| c.id.clone()).collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut reordered: Vec<ScoredCandidate> = Vec::with_capacity(selected.len());

    for id in &outcome.order {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(mut c) = by_id.remove(id) {
            c.rerank_reason = outcome.reasons.get(id).cloned();
            reordered.push(c);
        } else {
            debug!(id = %id, "Reranker returned an unknown id, dropping");
        }
    }
    for id in &original_order {
        if let Some(c) = by_id.remove(id) {
            reordered.push(c);
        }
    }
    reordered
}

/// Run the reranker against its timeout and apply the contract. Returns the
/// (possibly reordered) list and whether the rerank was actually applied.
pub async fn rerank_best_effort(
    reranker: &dyn Reranker,
    selected: Vec<ScoredCandidate>,
    text: &str,
    intent_label: &str,
    lat: f64,
    lon: f64,
) -> (Vec<ScoredCandidate>, bool) {
    // Nothing to reorder
    if selected.len() <= 1 {
        return (selected, false);
    }

    let window = &selected[..selected.len().min(RERANK_MAX_CANDIDATES)];
    let call = reranker.rerank(window, text, intent_label, lat, lon);
    match tokio::time::timeout(RERANK_TIMEOUT, call).await {
        Ok(Ok(outcome)) if !outcome.order.is_empty() => {
            (apply_rerank(selected, outcome), true)
        }
        Ok(Ok(_)) => {
            debug!("Reranker returned an empty order, keeping original");
            (selected, false)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Rerank failed, keeping original order");
            (selected, false)
        }
        Err(_) => {
            warn!("Rerank timed out, keeping original order");
            (selected, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetspot_common::PlaceKind;

    fn scored(id: &str) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            kind: PlaceKind::Cafe,
            name: Some(id.to_string()),
            lat: 0.0,
            lon: 0.0,
            score: 1.0,
            distance_meters: 100.0,
            cell_id: "c".into(),
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

    fn ids(cands: &[ScoredCandidate]) -> Vec<&str> {
        cands.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn reorders_without_changing_id_set() {
        let selected = vec![scored("a"), scored("b"), scored("c")];
        let outcome = RerankOutcome {
            order: vec!["c".into(), "a".into(), "b".into()],
            reasons: HashMap::new(),
        };
        let out = apply_rerank(selected, outcome);
        assert_eq!(ids(&out), vec!["c", "a", "b"]);
    }

    #[test]
    fn unknown_ids_are_dropped_missing_appended() {
        let selected = vec![scored("a"), scored("b"), scored("c")];
        let outcome = RerankOutcome {
            order: vec!["ghost".into(), "b".into()],
            reasons: HashMap::new(),
        };
        let out = apply_rerank(selected, outcome);
        // b first, then a and c in their original relative order
        assert_eq!(ids(&out), vec!["b", "a", "c"]);
    }

    #[test]
    fn repeated_ids_count_once() {
        let selected = vec![scored("a"), scored("b")];
        let outcome = RerankOutcome {
            order: vec!["b".into(), "b".into(), "a".into()],
            reasons: HashMap::new(),
        };
        let out = apply_rerank(selected, outcome);
        assert_eq!(ids(&out), vec!["b", "a"]);
    }

    #[test]
    fn reasons_attach_to_known_ids() {
        let selected = vec![scored("a"), scored("b")];
        let mut reasons = HashMap::new();
        reasons.insert("b".to_string(), "well lit".to_string());
        reasons.insert("ghost".to_string(), "irrelevant".to_string());
        let outcome = RerankOutcome {
            order: vec!["b".into(), "a".into()],
            reasons,
        };
        let out = apply_rerank(selected, outcome);
        assert_eq!(out[0].rerank_reason.as_deref(), Some("well lit"));
        assert_eq!(out[1].rerank_reason, None);
    }

    struct FailingReranker;

    #[async_trait]
    impl Reranker for FailingReranker {
        async fn rerank(
            &self,
            _candidates: &[ScoredCandidate],
            _text: &str,
            _intent_label: &str,
            _lat: f64,
            _lon: f64,
        ) -> Result<RerankOutcome> {
            anyhow::bail!("collaborator unavailable")
        }
    }

    struct SlowReranker;

    #[async_trait]
    impl Reranker for SlowReranker {
        async fn rerank(
            &self,
            _candidates: &[ScoredCandidate],
            _text: &str,
            _intent_label: &str,
            _lat: f64,
            _lon: f64,
        ) -> Result<RerankOutcome> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(RerankOutcome::default())
        }
    }

    #[tokio::test]
    async fn failure_keeps_original_order() {
        let selected = vec![scored("a"), scored("b")];
        let (out, applied) =
            rerank_best_effort(&FailingReranker, selected, "", "general meetup", 0.0, 0.0).await;
        assert!(!applied);
        assert_eq!(ids(&out), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_keeps_original_order() {
        let selected = vec![scored("a"), scored("b")];
        let (out, applied) =
            rerank_best_effort(&SlowReranker, selected, "", "general meetup", 0.0, 0.0).await;
        assert!(!applied);
        assert_eq!(ids(&out), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn single_candidate_skips_the_call() {
        struct PanickingReranker;
        #[async_trait]
        impl Reranker for PanickingReranker {
            async fn rerank(
                &self,
                _c: &[ScoredCandidate],
                _t: &str,
                _l: &str,
                _la: f64,
                _lo: f64,
            ) -> Result<RerankOutcome> {
                panic!("must not be called for a single candidate");
            }
        }
        let selected = vec![scored("only")];
        let (out, applied) =
            rerank_best_effort(&PanickingReranker, selected, "", "general meetup", 0.0, 0.0).await;
        assert!(!applied);
        assert_eq!(ids(&out), vec!["only"]);
    }
}
