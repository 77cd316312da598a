//! Readiness and screening calculator.
//!
//! All functions are pure and round their result to two decimals. Inputs are
//! assumed validated at the boundary (ratings are typed, scores are checked
//! by the session before they arrive here).

use pe_core::{
    round2, ConfigError, Dimension, DimensionRatings, DimensionWeights, ModelCoefficients, Rating,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Screening score above which a candidate can be rated strong.
pub const STRONG_SCREENING_THRESHOLD: f64 = 120.0;
/// Org-AI-R above which a candidate can be rated strong.
pub const STRONG_READINESS_THRESHOLD: f64 = 60.0;
pub const PROMISING_SCREENING_THRESHOLD: f64 = 100.0;
pub const PROMISING_READINESS_THRESHOLD: f64 = 50.0;

/// Map a 1..=5 rating onto 0..=100.
pub fn dimension_score(rating: Rating) -> f64 {
    round2(f64::from(rating.value()) / 5.0 * 100.0)
}

pub fn dimension_scores(ratings: &DimensionRatings) -> BTreeMap<Dimension, f64> {
    ratings
        .iter()
        .map(|(d, r)| (*d, dimension_score(*r)))
        .collect()
}

/// Idiosyncratic readiness V_org_R: weighted sum of dimension scores.
///
/// Dimensions without a score contribute 0. The weight table must cover all
/// seven dimensions.
pub fn idiosyncratic_readiness(
    scores: &BTreeMap<Dimension, f64>,
    weights: &DimensionWeights,
) -> Result<f64, ConfigError> {
    weights.ensure_complete("sector")?;
    let total: f64 = weights
        .iter()
        .map(|(d, w)| scores.get(&d).copied().unwrap_or(0.0) * w)
        .sum();
    Ok(round2(total))
}

pub fn synergy(v_org_r: f64, h_org_k_r: f64) -> f64 {
    v_org_r.min(h_org_k_r)
}

/// Org-AI-R = alpha·V + (1 − alpha)·H + beta·synergy.
pub fn org_ai_r(v_org_r: f64, h_org_k_r: f64, synergy: f64, alpha: f64, beta: f64) -> f64 {
    round2(alpha * v_org_r + (1.0 - alpha) * h_org_k_r + beta * synergy)
}

pub fn screening_score(h_org_k_r: f64, external_signals: f64, epsilon: f64) -> f64 {
    round2(h_org_k_r + epsilon * external_signals)
}

/// Three-tier screening classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningRecommendation {
    Strong,
    Promising,
    Watchlist,
}

impl ScreeningRecommendation {
    pub fn classify(screening_score: f64, org_ai_r: f64) -> Self {
        if screening_score > STRONG_SCREENING_THRESHOLD && org_ai_r > STRONG_READINESS_THRESHOLD {
            ScreeningRecommendation::Strong
        } else if screening_score > PROMISING_SCREENING_THRESHOLD
            || org_ai_r > PROMISING_READINESS_THRESHOLD
        {
            ScreeningRecommendation::Promising
        } else {
            ScreeningRecommendation::Watchlist
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScreeningRecommendation::Strong => "Strong",
            ScreeningRecommendation::Promising => "Promising",
            ScreeningRecommendation::Watchlist => "Watchlist",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScreeningRecommendation::Strong => {
                "Strong AI candidate: High potential and readiness. Prioritize for deep dive."
            }
            ScreeningRecommendation::Promising => {
                "Promising AI candidate: Investigate further. May have specific strengths."
            }
            ScreeningRecommendation::Watchlist => {
                "Watchlist: Lower immediate AI priority. Monitor for changes or specific, targeted initiatives."
            }
        }
    }
}

/// Components of an Org-AI-R computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub v_org_r: f64,
    pub h_org_k_r: f64,
    pub synergy: f64,
    pub org_ai_r: f64,
}

impl ReadinessBreakdown {
    /// Blend a known V_org_R with the sector opportunity.
    pub fn from_v(v_org_r: f64, h_org_k_r: f64, coefficients: &ModelCoefficients) -> Self {
        let synergy = synergy(v_org_r, h_org_k_r);
        Self {
            v_org_r,
            h_org_k_r,
            synergy,
            org_ai_r: org_ai_r(
                v_org_r,
                h_org_k_r,
                synergy,
                coefficients.alpha,
                coefficients.beta,
            ),
        }
    }
}

/// Ratings → dimension scores → V_org_R → Org-AI-R.
pub fn assess_readiness(
    ratings: &DimensionRatings,
    weights: &DimensionWeights,
    h_org_k_r: f64,
    coefficients: &ModelCoefficients,
) -> Result<ReadinessBreakdown, ConfigError> {
    let v = idiosyncratic_readiness(&dimension_scores(ratings), weights)?;
    Ok(ReadinessBreakdown::from_v(v, h_org_k_r, coefficients))
}

/// Step-1 quick screen built from a preliminary V_org_R estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreeningView {
    pub readiness: ReadinessBreakdown,
    pub external_signals: f64,
    pub screening_score: f64,
    pub recommendation: ScreeningRecommendation,
}

pub fn screen(
    baseline_v_org_r: f64,
    h_org_k_r: f64,
    external_signals: f64,
    coefficients: &ModelCoefficients,
) -> ScreeningView {
    let readiness = ReadinessBreakdown::from_v(baseline_v_org_r, h_org_k_r, coefficients);
    let score = screening_score(h_org_k_r, external_signals, coefficients.epsilon);
    ScreeningView {
        readiness,
        external_signals,
        screening_score: score,
        recommendation: ScreeningRecommendation::classify(score, readiness.org_ai_r),
    }
}

/// One row of the current-vs-target gap table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapRow {
    pub dimension: Dimension,
    pub current: Rating,
    pub current_score: f64,
    pub target: Rating,
    pub target_score: f64,
    /// target_score − current_score; negative when the target is below today.
    pub gap: f64,
}

/// Per-dimension gaps, largest first. Ties keep catalog order.
pub fn gap_analysis(current: &DimensionRatings, target: &DimensionRatings) -> Vec<GapRow> {
    let mut rows: Vec<GapRow> = Dimension::ALL
        .iter()
        .filter_map(|d| {
            let c = *current.get(d)?;
            let t = *target.get(d)?;
            let current_score = dimension_score(c);
            let target_score = dimension_score(t);
            Some(GapRow {
                dimension: *d,
                current: c,
                current_score,
                target: t,
                target_score,
                gap: round2(target_score - current_score),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.gap.total_cmp(&a.gap));
    rows
}
