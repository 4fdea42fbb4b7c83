//! Intent classification and per-intent configuration.
//!
//! Classification is keyword heuristics over normalized text — fast,
//! deterministic, no model call. First matching intent wins.

use std::collections::HashMap;

use meetspot_common::{Intent, KindWeights, PlaceKind};

use crate::tuning::ScoringTuning;

/// Classify free text into a meetup intent. Pure and total: identical text
/// always yields the same intent, empty text is a general meetup.
pub fn classify(text: &str) -> Intent {
    let normalized = normalize(text);

    if contains_any(
        &normalized,
        &["marketplace", "sell", "selling", "buyer", "cash", "facebook"],
    ) {
        return Intent::MarketplaceSale;
    }
    if contains_any(&normalized, &["date", "tinder", "bumble", "hinge"]) {
        return Intent::FirstDate;
    }
    if contains_any(&normalized, &["night", "walk", "parking", "late"]) {
        return Intent::NightWalk;
    }
    Intent::GeneralMeetup
}

/// Lowercase and strip non-alphanumerics to spaces so punctuation and casing
/// never change the classification.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

fn contains_any(normalized: &str, keywords: &[&str]) -> bool {
    normalized
        .split_whitespace()
        .any(|word| keywords.iter().any(|k| word.starts_with(k)))
}

/// Static per-intent configuration: search radius, place-type weights, and
/// the ordered set of kinds worth querying the place source for.
#[derive(Debug, Clone)]
pub struct IntentConfig {
    pub intent: Intent,
    pub label: &'static str,
    pub search_radius_meters: f64,
    pub kind_weights: KindWeights,
    pub query_kinds: Vec<PlaceKind>,
    pub tuning: ScoringTuning,
}

impl IntentConfig {
    /// Candidates may sit this far from the query point before exclusion.
    pub fn max_distance_meters(&self) -> f64 {
        self.search_radius_meters
    }

    pub fn kind_weight(&self, kind: PlaceKind) -> f64 {
        self.kind_weights.get(&kind).copied().unwrap_or(0.5)
    }

    pub fn for_intent(intent: Intent) -> Self {
        use PlaceKind::*;
        match intent {
            Intent::MarketplaceSale => Self::build(
                intent,
                "marketplace sale",
                6_500.0,
                &[
                    (PoliceStation, 1.0),
                    (Bank, 0.8),
                    (ShoppingMall, 0.7),
                    (Grocery, 0.6),
                    (GasStation, 0.6),
                    (TransitStation, 0.5),
                    (Library, 0.5),
                    (Cafe, 0.45),
                    (Park, 0.2),
                    (CommunityHotspot, 0.75),
                ],
                vec![PoliceStation, Bank, ShoppingMall, Grocery, GasStation],
            ),
            Intent::FirstDate => Self::build(
                intent,
                "first date",
                4_000.0,
                &[
                    (Cafe, 1.0),
                    (Park, 0.7),
                    (Library, 0.65),
                    (ShoppingMall, 0.6),
                    (TransitStation, 0.5),
                    (Grocery, 0.4),
                    (PoliceStation, 0.35),
                    (Bank, 0.3),
                    (GasStation, 0.25),
                    (CommunityHotspot, 0.6),
                ],
                vec![Cafe, Park, Library, ShoppingMall],
            ),
            Intent::NightWalk => Self::build(
                intent,
                "night walk",
                5_000.0,
                &[
                    (PoliceStation, 0.95),
                    (GasStation, 0.8),
                    (TransitStation, 0.75),
                    (Grocery, 0.6),
                    (Cafe, 0.5),
                    (ShoppingMall, 0.5),
                    (Park, 0.45),
                    (Bank, 0.4),
                    (Library, 0.3),
                    (CommunityHotspot, 0.7),
                ],
                vec![PoliceStation, GasStation, TransitStation, Grocery],
            ),
            Intent::GeneralMeetup => Self::build(
                intent,
                "general meetup",
                5_000.0,
                &[
                    (Cafe, 0.7),
                    (ShoppingMall, 0.7),
                    (Library, 0.65),
                    (Grocery, 0.6),
                    (TransitStation, 0.6),
                    (PoliceStation, 0.6),
                    (Park, 0.55),
                    (Bank, 0.5),
                    (GasStation, 0.5),
                    (CommunityHotspot, 0.65),
                ],
                vec![Cafe, ShoppingMall, Library, Grocery, PoliceStation],
            ),
        }
    }

    fn build(
        intent: Intent,
        label: &'static str,
        radius: f64,
        weights: &[(PlaceKind, f64)],
        query_kinds: Vec<PlaceKind>,
    ) -> Self {
        let kind_weights: HashMap<PlaceKind, f64> = weights.iter().copied().collect();
        Self {
            intent,
            label,
            search_radius_meters: radius,
            kind_weights,
            query_kinds,
            tuning: ScoringTuning::default(),
        }
    }
}
