//! Scoring coefficients, named and in one place.
//!
//! These are tuned values, not derivations. Community evidence and distance
//! are meant to dominate; place-type fit nudges. Changing any of these
//! changes ranking behavior, so keep edits deliberate and reviewed.

/// All coefficients consumed by the scorer. One instance per intent config;
/// currently every intent shares the defaults.
#[derive(Debug, Clone)]
pub struct ScoringTuning {
    /// Weight of the linear distance falloff sub-score.
    pub distance_weight: f64,
    /// Weight of the log-compressed camera density sub-score.
    pub camera_weight: f64,
    /// Camera count at which the camera sub-score saturates (log1p(n)/ln(sat)).
    pub camera_saturation: f64,

    /// Yes-report step tiers, highest threshold first: (min yes, bonus).
    pub yes_tiers: [(u32, f64); 4],
    /// No-reports use the same tiers mirrored negative.
    pub signage_bonus_per_report: f64,
    pub signage_bonus_cap: f64,

    /// Similarity floor for borrowing a neighbor cell's evidence at all.
    pub name_similarity_floor: f64,
    /// Similarity at which the attributed report "strongly" names this place.
    pub name_match_strong: f64,
    pub name_match_boost: f64,
    /// Applied when the attributed cell names a *different* place.
    pub name_mismatch_penalty: f64,

    /// Added when the user's free text mentions the candidate by name.
    pub prompt_mention_boost: f64,
    /// Minimum token length that counts as a distinguishing name mention.
    pub prompt_mention_min_token: usize,

    /// Type bonus = (kind_weight - type_neutral_weight) * type_bonus_factor.
    pub type_bonus_factor: f64,
    pub type_neutral_weight: f64,

    /// Subtracted when both yes and no evidence attach to one candidate.
    pub conflict_penalty: f64,

    /// Hotspots with no nearby cameras and few yes-reports are penalized:
    /// they supplement independent evidence, they don't replace it.
    pub weak_hotspot_penalty: f64,
    pub weak_hotspot_yes_floor: u32,

    /// Candidates may exceed the intent radius by this factor before exclusion.
    pub distance_slack: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            distance_weight: 1.0,
            camera_weight: 0.9,
            camera_saturation: 19.0,
            yes_tiers: [(6, 1.15), (4, 0.85), (2, 0.55), (1, 0.25)],
            signage_bonus_per_report: 0.1,
            signage_bonus_cap: 0.3,
            name_similarity_floor: 0.45,
            name_match_strong: 0.6,
            name_match_boost: 0.35,
            name_mismatch_penalty: 0.15,
            prompt_mention_boost: 0.5,
            prompt_mention_min_token: 4,
            type_bonus_factor: 0.3,
            type_neutral_weight: 0.5,
            conflict_penalty: 0.35,
            weak_hotspot_penalty: 0.4,
            weak_hotspot_yes_floor: 5,
            distance_slack: 1.05,
        }
    }
}

impl ScoringTuning {
    /// Step bonus for a yes-count, 0.0 below the lowest tier.
    pub fn yes_bonus(&self, yes: u32) -> f64 {
        for (floor, bonus) in self.yes_tiers {
            if yes >= floor {
                return bonus;
            }
        }
        0.0
    }

    /// Mirrored step penalty for a no-count (returned as a positive magnitude).
    pub fn no_penalty(&self, no: u32) -> f64 {
        self.yes_bonus(no)
    }

    pub fn signage_bonus(&self, signage: u32) -> f64 {
        (self.signage_bonus_per_report * signage as f64).min(self.signage_bonus_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_tiers_step_up() {
        let t = ScoringTuning::default();
        assert_eq!(t.yes_bonus(0), 0.0);
        assert_eq!(t.yes_bonus(1), 0.25);
        assert_eq!(t.yes_bonus(2), 0.55);
        assert_eq!(t.yes_bonus(3), 0.55);
        assert_eq!(t.yes_bonus(4), 0.85);
        assert_eq!(t.yes_bonus(6), 1.15);
        assert_eq!(t.yes_bonus(40), 1.15);
    }

    #[test]
    fn no_penalty_mirrors_yes() {
        let t = ScoringTuning::default();
        assert_eq!(t.no_penalty(6), t.yes_bonus(6));
        assert_eq!(t.no_penalty(1), t.yes_bonus(1));
    }

    #[test]
    fn signage_bonus_is_capped() {
        let t = ScoringTuning::default();
        assert!((t.signage_bonus(1) - 0.1).abs() < 1e-9);
        assert!((t.signage_bonus(10) - 0.3).abs() < 1e-9);
    }
}
