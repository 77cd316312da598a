//! Initiative parameter estimator.
//!
//! Produces default investment, success probability, execution quality,
//! EBITDA impact and readiness delta for a catalog use case. Randomness is
//! seeded from the use-case name only, so every company sees the same base
//! draws for a given use case. All draws happen in a fixed order whether or
//! not a value is overridden.

use crate::simulate::seeded_rng;
use pe_core::{
    round2, validate_fraction, validate_investment, validate_score, Complexity, Initiative,
    UseCase, ValidationError, DIAGNOSTIC_USE_CASE,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Average months used when a timeline bucket is not recognised.
pub const DEFAULT_TIMELINE_MONTHS: f64 = 6.0;

pub fn complexity_factor(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Low => 0.7,
        Complexity::LowMedium => 0.6,
        Complexity::Medium => 0.5,
        Complexity::High => 0.3,
    }
}

/// Average month count for a timeline bucket label such as "6-12".
pub fn timeline_average_months(label: &str) -> f64 {
    match label.trim() {
        "1-3" => 2.0,
        "3-6" => 4.5,
        "6-9" => 7.5,
        "6-12" => 9.0,
        "9-15" => 12.0,
        "12-18" => 15.0,
        "12-24" => 18.0,
        other => {
            debug!(bucket = other, "unmapped timeline bucket, using default");
            DEFAULT_TIMELINE_MONTHS
        }
    }
}

/// Company context the estimates are scaled by.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimationContext {
    pub v_org_r: f64,
    pub h_org_k_r: f64,
    pub base_ebitda_m: f64,
}

/// User-supplied replacements for any of the five estimated outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitiativeOverrides {
    pub investment_m: Option<f64>,
    pub prob_success: Option<f64>,
    pub exec_quality: Option<f64>,
    /// Adjusted EBITDA impact in percent of base EBITDA.
    pub ebitda_impact_pct: Option<f64>,
    pub delta_org_ai_r: Option<f64>,
}

impl InitiativeOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Boundary checks for user-entered overrides.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = self.investment_m {
            validate_investment(v)?;
        }
        if let Some(v) = self.prob_success {
            validate_fraction("probability of success", v)?;
        }
        if let Some(v) = self.exec_quality {
            validate_fraction("execution quality", v)?;
        }
        if let Some(v) = self.ebitda_impact_pct {
            validate_score("EBITDA impact", v)?;
        }
        if let Some(v) = self.delta_org_ai_r {
            validate_score("delta Org-AI-R", v)?;
        }
        Ok(())
    }

    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: InitiativeOverrides) -> Self {
        Self {
            investment_m: other.investment_m.or(self.investment_m),
            prob_success: other.prob_success.or(self.prob_success),
            exec_quality: other.exec_quality.or(self.exec_quality),
            ebitda_impact_pct: other.ebitda_impact_pct.or(self.ebitda_impact_pct),
            delta_org_ai_r: other.delta_org_ai_r.or(self.delta_org_ai_r),
        }
    }
}

/// Estimate a planned initiative for `use_case` in the given company context.
pub fn estimate_initiative(
    use_case: &UseCase,
    ctx: &EstimationContext,
    overrides: &InitiativeOverrides,
) -> Initiative {
    let cf = complexity_factor(use_case.complexity);
    let months = timeline_average_months(&use_case.timeline);
    let v = ctx.v_org_r / 100.0;
    let h = ctx.h_org_k_r / 100.0;
    let mut rng = seeded_rng(&[use_case.name.as_str()]);

    let cost_noise: f64 = rng.gen_range(0.8..1.2);
    let default_investment = round2(0.2 * cf * (months / 6.0) * cost_noise + 0.1);
    let default_prob = round2((0.6 + v * 0.2 - cf * 0.3).clamp(0.5, 0.95));
    let default_exec = round2((v * 0.8).clamp(0.6, 0.9));

    let investment_m = overrides.investment_m.unwrap_or(default_investment);
    let prob_success = overrides.prob_success.unwrap_or(default_prob);
    let exec_quality = overrides.exec_quality.unwrap_or(default_exec);

    let (lo, hi) = if use_case.impact_min_pct <= use_case.impact_max_pct {
        (use_case.impact_min_pct, use_case.impact_max_pct)
    } else {
        (use_case.impact_max_pct, use_case.impact_min_pct)
    };
    let mut base_impact_pct: f64 = rng.gen_range(lo..=hi);
    if use_case.name == DIAGNOSTIC_USE_CASE && base_impact_pct == 0.0 {
        base_impact_pct = rng.gen_range(1.0..3.0);
    }

    let contextual_pct = base_impact_pct * h * (v * 0.5 + 0.5);
    let ebitda_impact_pct = overrides
        .ebitda_impact_pct
        .unwrap_or_else(|| round2(contextual_pct * prob_success * exec_quality));
    let ebitda_impact_m = round2(ctx.base_ebitda_m * ebitda_impact_pct / 100.0);

    let delta_noise: f64 = rng.gen_range(5.0..15.0);
    let base_delta = round2(delta_noise * cf * (base_impact_pct / 2.0));
    let delta_org_ai_r = overrides
        .delta_org_ai_r
        .unwrap_or_else(|| round2(base_delta * prob_success * exec_quality).max(1.0));

    debug!(
        use_case = %use_case.name,
        investment_m,
        prob_success,
        exec_quality,
        ebitda_impact_pct,
        delta_org_ai_r,
        "estimated initiative"
    );

    Initiative {
        use_case: use_case.name.clone(),
        complexity: use_case.complexity,
        timeline_months: months,
        investment_m,
        prob_success,
        exec_quality,
        ebitda_impact_pct,
        ebitda_impact_m,
        delta_org_ai_r,
    }
}
