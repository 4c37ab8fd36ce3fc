//! Feature computation for token evaluation.
//!
//! Turns a market snapshot into normalized scores (0.0-1.0), a confidence
//! level and an urgency class. Everything here is a pure function of the
//! snapshot and the risk parameters.

use crate::oracle::types::{RiskParameters, Urgency};
use crate::types::MarketSnapshot;
use tracing::{debug, instrument};

/// Scores derived from a single snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScores {
    pub liquidity_score: f64,
    pub social_score: f64,
    pub risk_score: f64,
    pub confidence: f64,
    pub urgency: Urgency,
}

/// Computes feature scores against a fixed set of risk parameters.
#[derive(Debug, Clone)]
pub struct FeatureComputer {
    risk: RiskParameters,
}

impl FeatureComputer {
    pub fn new(risk: RiskParameters) -> Self {
        Self { risk }
    }

    /// Compute all scores for a snapshot. Negative or non-finite metrics are
    /// treated as zero.
    #[instrument(skip(self, snapshot))]
    pub fn compute(&self, snapshot: &MarketSnapshot) -> FeatureScores {
        let snapshot = snapshot.sanitized();
        let confidence = self.confidence(&snapshot);

        let scores = FeatureScores {
            liquidity_score: liquidity_score(&snapshot),
            social_score: social_score(&snapshot),
            risk_score: risk_score(&snapshot),
            confidence,
            urgency: urgency(confidence, snapshot.age_minutes),
        };

        debug!(
            "Computed features: liquidity={:.3} social={:.3} risk={:.3} confidence={:.3} urgency={:?}",
            scores.liquidity_score,
            scores.social_score,
            scores.risk_score,
            scores.confidence,
            scores.urgency
        );
        scores
    }

    /// Additive confidence over independent bonuses, clamped to [0, 1].
    /// Bonuses are summed in tenths so exact totals meet the 0.8 and 0.9 bars.
    fn confidence(&self, snapshot: &MarketSnapshot) -> f64 {
        let mut tenths: u8 = 0;

        if snapshot.lp_burned_pct >= self.risk.min_lp_burned_pct {
            tenths += 4;
        }
        if snapshot.volume_24h >= self.risk.min_volume {
            tenths += 3;
        }
        if snapshot.social_mentions >= self.risk.min_social_mentions {
            tenths += 3;
        }
        if snapshot.holder_count >= 100.0 {
            tenths += 1;
        }
        if snapshot.market_cap >= 100_000.0 {
            tenths += 1;
        }

        // The <= 5 arm is unreachable behind <= 30. Branch order must not change
        // until the bonus for very young tokens is confirmed.
        if snapshot.age_minutes <= 30.0 {
            tenths += 2;
        } else if snapshot.age_minutes <= 5.0 {
            tenths += 3;
        }

        (f64::from(tenths) / 10.0).clamp(0.0, 1.0)
    }
}

/// Volume normalized against 10k, clamped to [0, 1].
pub fn liquidity_score(snapshot: &MarketSnapshot) -> f64 {
    (snapshot.volume_24h / 10_000.0).clamp(0.0, 1.0)
}

/// Mentions normalized against 100, clamped to [0, 1].
pub fn social_score(snapshot: &MarketSnapshot) -> f64 {
    (snapshot.social_mentions / 100.0).clamp(0.0, 1.0)
}

/// Heuristic risk in [0, 1]; every applicable adjustment fires.
pub fn risk_score(snapshot: &MarketSnapshot) -> f64 {
    let mut risk: f64 = 0.0;

    if snapshot.volume_24h < 1_000.0 {
        risk += 0.3;
    }
    if snapshot.volume_24h > 10_000.0 {
        risk -= 0.2;
    }
    if snapshot.social_mentions < 5.0 {
        risk += 0.2;
    }
    if snapshot.social_mentions > 50.0 {
        risk -= 0.1;
    }
    if snapshot.age_minutes < 1.0 {
        risk += 0.3;
    }
    if snapshot.age_minutes > 60.0 {
        risk -= 0.1;
    }
    if snapshot.holder_count < 10.0 {
        risk += 0.2;
    }
    if snapshot.holder_count > 1_000.0 {
        risk -= 0.1;
    }

    risk.clamp(0.0, 1.0)
}

pub fn urgency(confidence: f64, age_minutes: f64) -> Urgency {
    if confidence >= 0.9 && age_minutes <= 5.0 {
        Urgency::High
    } else if confidence >= 0.8 {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}
