//! Multi-year plan builder.
//!
//! Every initiative posts its investment and readiness delta once, in its
//! completion year. Its EBITDA impact is a run-rate: it counts toward the
//! cumulative figure from the completion year to the end of the horizon
//! without being added again. Trajectories are always rebuilt in full.

use pe_core::{round2, Horizon, Initiative, OverrunPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Figures at the end of one plan year.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub year: u8,
    pub org_ai_r: f64,
    /// Investment posted by initiatives completing this year.
    pub investment_m: f64,
    pub cumulative_investment_m: f64,
    /// EBITDA impact first realised this year.
    pub new_ebitda_impact_m: f64,
    /// Run-rate EBITDA impact of every initiative completed so far.
    pub cumulative_ebitda_impact_m: f64,
}

/// A year-by-year trajectory for one initiative set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanTrajectory {
    pub horizon: Horizon,
    pub starting_org_ai_r: f64,
    pub years: Vec<YearSnapshot>,
    /// Initiatives that complete after the horizon and post nothing.
    pub dropped: Vec<String>,
}

impl PlanTrajectory {
    pub fn last_year(&self) -> Option<&YearSnapshot> {
        self.years.last()
    }

    pub fn final_org_ai_r(&self) -> f64 {
        self.last_year()
            .map_or(self.starting_org_ai_r, |y| y.org_ai_r)
    }

    pub fn total_investment_m(&self) -> f64 {
        self.last_year().map_or(0.0, |y| y.cumulative_investment_m)
    }

    pub fn total_ebitda_impact_m(&self) -> f64 {
        self.last_year()
            .map_or(0.0, |y| y.cumulative_ebitda_impact_m)
    }
}

/// Year in which an initiative of `timeline_months` posts its effect.
///
/// `ceil(months / 12)` floored at year 1. Returns `None` when the year lies
/// past the horizon and the policy is [`OverrunPolicy::Drop`].
pub fn completion_year(timeline_months: f64, horizon: Horizon, policy: OverrunPolicy) -> Option<u8> {
    let last = horizon.years();
    let raw = (timeline_months / 12.0).ceil();
    if !raw.is_finite() || raw < 1.0 {
        return Some(1);
    }
    if raw > f64::from(last) {
        return match policy {
            OverrunPolicy::Drop => None,
            OverrunPolicy::ClampToHorizon => Some(last),
        };
    }
    // 1.0 <= raw <= last <= 5, so the cast is exact.
    Some(raw as u8)
}

/// Build the trajectory for `initiatives` starting at `starting_org_ai_r`.
pub fn build_plan(
    initiatives: &[Initiative],
    starting_org_ai_r: f64,
    horizon: Horizon,
    policy: OverrunPolicy,
) -> PlanTrajectory {
    let n = usize::from(horizon.years());
    let mut investment = vec![0.0; n + 1];
    let mut delta = vec![0.0; n + 1];
    let mut new_impact = vec![0.0; n + 1];
    let mut dropped = Vec::new();

    for initiative in initiatives {
        match completion_year(initiative.timeline_months, horizon, policy) {
            Some(year) => {
                let y = usize::from(year);
                investment[y] += initiative.investment_m;
                delta[y] += initiative.delta_org_ai_r;
                new_impact[y] += initiative.ebitda_impact_m;
            }
            None => {
                debug!(
                    use_case = %initiative.use_case,
                    months = initiative.timeline_months,
                    horizon = horizon.years(),
                    "initiative completes after horizon, dropped"
                );
                dropped.push(initiative.use_case.clone());
            }
        }
    }

    let mut readiness = starting_org_ai_r;
    let mut cumulative_investment = 0.0;
    let mut cumulative_impact = 0.0;
    let mut years = Vec::with_capacity(n);
    for y in 1..=n {
        readiness += delta[y];
        cumulative_investment += investment[y];
        cumulative_impact += new_impact[y];
        years.push(YearSnapshot {
            year: y as u8,
            org_ai_r: round2(readiness),
            investment_m: round2(investment[y]),
            cumulative_investment_m: round2(cumulative_investment),
            new_ebitda_impact_m: round2(new_impact[y]),
            cumulative_ebitda_impact_m: round2(cumulative_impact),
        });
    }

    PlanTrajectory {
        horizon,
        starting_org_ai_r,
        years,
        dropped,
    }
}
