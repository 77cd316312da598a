//! Investment efficiency, portfolio ranking and the portfolio table.

use crate::plan::PlanTrajectory;
use pe_core::{round2, ConfigError, PortfolioEntry, PortfolioSeed};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// AI investment efficiency: (Δ readiness / investment) × EBITDA impact.
///
/// Returns 0.0 when no money was invested.
pub fn investment_efficiency(delta_org_ai_r: f64, investment_m: f64, ebitda_impact_m: f64) -> f64 {
    if investment_m <= 0.0 {
        debug!(investment_m, "no investment, efficiency is zero");
        return 0.0;
    }
    round2(delta_org_ai_r / investment_m * ebitda_impact_m)
}

/// Share of portfolio scores at or below `score`, in percent.
///
/// Ties count as at-or-below. An empty portfolio yields 0.0.
pub fn percentile(score: f64, portfolio: &[f64]) -> f64 {
    if portfolio.is_empty() {
        return 0.0;
    }
    let rank = portfolio.iter().filter(|s| **s <= score).count();
    round2(rank as f64 / portfolio.len() as f64 * 100.0)
}

/// Mean and sample standard deviation. The deviation is `None` for fewer
/// than two values.
pub fn mean_and_std(values: &[f64]) -> (f64, Option<f64>) {
    if values.is_empty() {
        return (0.0, None);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, None);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, Some(variance.sqrt()))
}

/// Standard score; 0.0 when the deviation is zero or undefined.
pub fn z_score(score: f64, mean: f64, std: Option<f64>) -> f64 {
    match std {
        Some(s) if s.is_finite() && s != 0.0 => round2((score - mean) / s),
        _ => {
            debug!(?std, "degenerate portfolio deviation, z-score is zero");
            0.0
        }
    }
}

/// Totals of a plan as written back to the portfolio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub final_org_ai_r: f64,
    pub delta_org_ai_r: f64,
    pub investment_m: f64,
    pub ebitda_impact_m: f64,
    pub efficiency: f64,
}

impl PlanOutcome {
    /// Summarise a plan. Without a plan the readiness carries forward and
    /// every other figure is zero.
    pub fn from_plan(starting_org_ai_r: f64, plan: Option<&PlanTrajectory>) -> Self {
        let Some(plan) = plan else {
            return Self {
                final_org_ai_r: starting_org_ai_r,
                delta_org_ai_r: 0.0,
                investment_m: 0.0,
                ebitda_impact_m: 0.0,
                efficiency: 0.0,
            };
        };
        let final_org_ai_r = plan.final_org_ai_r();
        let delta = final_org_ai_r - starting_org_ai_r;
        let investment = plan.total_investment_m();
        let impact = plan.total_ebitda_impact_m();
        // Efficiency uses the signed delta; the stored figures are floored at zero.
        let efficiency = investment_efficiency(delta, investment, impact);
        Self {
            final_org_ai_r,
            delta_org_ai_r: round2(delta.max(0.0)),
            investment_m: investment.max(0.0),
            ebitda_impact_m: impact.max(0.0),
            efficiency,
        }
    }
}

/// Where one company stands within the portfolio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub company: String,
    pub org_ai_r: f64,
    pub percentile: f64,
    pub z_score: f64,
    pub portfolio_mean: f64,
    pub portfolio_std: Option<f64>,
    pub efficiency: f64,
    pub efficiency_percentile: f64,
}

/// The portfolio table. Only the active company's row is ever rewritten.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

impl Portfolio {
    pub fn from_seeds(seeds: &[PortfolioSeed]) -> Self {
        let entries = seeds
            .iter()
            .map(|seed| {
                let ebitda_impact_m = round2(seed.company.ebitda_m * seed.ebitda_impact_pct / 100.0);
                PortfolioEntry {
                    company: seed.company.name.clone(),
                    sector: seed.company.sector,
                    baseline_org_ai_r: seed.baseline_org_ai_r,
                    current_org_ai_r: seed.current_org_ai_r,
                    delta_org_ai_r: seed.delta_org_ai_r,
                    investment_m: seed.investment_m,
                    efficiency: investment_efficiency(
                        seed.delta_org_ai_r,
                        seed.investment_m,
                        ebitda_impact_m,
                    ),
                    ebitda_impact_pct: seed.ebitda_impact_pct,
                    baseline_ebitda_m: seed.company.ebitda_m,
                    ebitda_m: seed.company.ebitda_m,
                    ebitda_impact_m,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, company: &str) -> Result<&PortfolioEntry, ConfigError> {
        self.entries
            .iter()
            .find(|e| e.company == company)
            .ok_or_else(|| ConfigError::UnknownCompany(company.to_string()))
    }

    /// Replace `company`'s row with one derived from `outcome`.
    ///
    /// The whole row is rebuilt from its identity and baseline fields, so
    /// committing again with different selections leaves nothing stale and
    /// the EBITDA base never compounds.
    pub fn commit_plan(
        &mut self,
        company: &str,
        outcome: &PlanOutcome,
    ) -> Result<&PortfolioEntry, ConfigError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.company == company)
            .ok_or_else(|| ConfigError::UnknownCompany(company.to_string()))?;
        let baseline_ebitda_m = slot.baseline_ebitda_m;
        let ebitda_impact_pct = if baseline_ebitda_m > 0.0 {
            round2(outcome.ebitda_impact_m / baseline_ebitda_m * 100.0)
        } else {
            0.0
        };
        *slot = PortfolioEntry {
            company: slot.company.clone(),
            sector: slot.sector,
            baseline_org_ai_r: slot.baseline_org_ai_r,
            current_org_ai_r: outcome.final_org_ai_r,
            delta_org_ai_r: outcome.delta_org_ai_r,
            investment_m: outcome.investment_m,
            efficiency: outcome.efficiency,
            ebitda_impact_pct,
            baseline_ebitda_m,
            ebitda_m: round2(baseline_ebitda_m + outcome.ebitda_impact_m),
            ebitda_impact_m: outcome.ebitda_impact_m,
        };
        info!(
            company,
            org_ai_r = slot.current_org_ai_r,
            efficiency = slot.efficiency,
            "committed plan to portfolio"
        );
        Ok(&*slot)
    }

    /// Percentile and z-score of `company`'s current Org-AI-R.
    pub fn benchmark(&self, company: &str) -> Result<BenchmarkReport, ConfigError> {
        let entry = self.get(company)?;
        let scores: Vec<f64> = self.entries.iter().map(|e| e.current_org_ai_r).collect();
        let efficiencies: Vec<f64> = self.entries.iter().map(|e| e.efficiency).collect();
        let (mean, std) = mean_and_std(&scores);
        Ok(BenchmarkReport {
            company: entry.company.clone(),
            org_ai_r: entry.current_org_ai_r,
            percentile: percentile(entry.current_org_ai_r, &scores),
            z_score: z_score(entry.current_org_ai_r, mean, std),
            portfolio_mean: round2(mean),
            portfolio_std: std.map(round2),
            efficiency: entry.efficiency,
            efficiency_percentile: percentile(entry.efficiency, &efficiencies),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pe_core::ReferenceData;
    use proptest::prelude::*;

    fn portfolio() -> Portfolio {
        Portfolio::from_seeds(&ReferenceData::builtin().portfolio)
    }

    #[test]
    fn efficiency_guards_zero_investment() {
        assert_eq!(investment_efficiency(10.0, 0.0, 5.0), 0.0);
        assert_eq!(investment_efficiency(10.0, -1.0, 5.0), 0.0);
        assert_eq!(investment_efficiency(5.0, 2.0, 0.5), 1.25);
    }

    #[test]
    fn percentile_counts_ties_as_at_or_below() {
        assert_eq!(percentile(50.0, &[]), 0.0);
        assert_eq!(percentile(80.0, &[60.0, 80.0, 80.0, 90.0]), 75.0);
        assert_eq!(percentile(90.0, &[90.0, 90.0]), 100.0);
        assert_eq!(percentile(10.0, &[20.0, 30.0]), 0.0);
    }

    #[test]
    fn z_score_degenerate_cases() {
        let (mean, std) = mean_and_std(&[70.0]);
        assert_eq!(std, None);
        assert_eq!(z_score(70.0, mean, std), 0.0);
        let (mean, std) = mean_and_std(&[55.0, 55.0, 55.0]);
        assert_eq!(std, Some(0.0));
        assert_eq!(z_score(55.0, mean, std), 0.0);
        let (mean, std) = mean_and_std(&[1.0, 2.0, 3.0]);
        assert_eq!(mean, 2.0);
        assert_eq!(std, Some(1.0));
        assert_eq!(z_score(3.0, mean, std), 1.0);
    }

    #[test]
    fn seed_rows_derive_impact_and_efficiency() {
        let p = portfolio();
        assert_eq!(p.len(), 8);
        let alpha = p.get("Alpha Manufacturing").unwrap();
        assert_eq!(alpha.ebitda_impact_m, 0.54);
        // 26 / 2.8 * 0.54
        assert_eq!(alpha.efficiency, 5.01);
        assert_eq!(alpha.ebitda_m, alpha.baseline_ebitda_m);
    }

    #[test]
    fn commit_overwrites_only_the_active_row() {
        let mut p = portfolio();
        let before = p.clone();
        let outcome = PlanOutcome {
            final_org_ai_r: 70.0,
            delta_org_ai_r: 16.0,
            investment_m: 0.5,
            ebitda_impact_m: 0.3,
            efficiency: 9.6,
        };
        let row = p.commit_plan("Alpha Manufacturing", &outcome).unwrap().clone();
        assert_eq!(row.current_org_ai_r, 70.0);
        assert_eq!(row.ebitda_m, 9.3);
        assert_eq!(row.baseline_org_ai_r, 42.0);
        assert_eq!(row.ebitda_impact_pct, 3.33);
        for (a, b) in p.entries().iter().zip(before.entries()).skip(1) {
            assert_eq!(a, b);
        }

        // Re-committing a smaller plan replaces every derived field.
        let smaller = PlanOutcome {
            final_org_ai_r: 60.0,
            delta_org_ai_r: 6.0,
            investment_m: 0.2,
            ebitda_impact_m: 0.1,
            efficiency: 3.0,
        };
        let row = p.commit_plan("Alpha Manufacturing", &smaller).unwrap();
        assert_eq!(row.ebitda_m, 9.1);
        assert_eq!(row.investment_m, 0.2);
        assert_eq!(row.efficiency, 3.0);
    }

    #[test]
    fn commit_unknown_company_fails() {
        let mut p = portfolio();
        let outcome = PlanOutcome::from_plan(50.0, None);
        assert_eq!(
            p.commit_plan("Omega", &outcome).map(|_| ()),
            Err(ConfigError::UnknownCompany("Omega".to_string()))
        );
    }

    #[test]
    fn missing_plan_yields_zero_outcome() {
        let outcome = PlanOutcome::from_plan(54.0, None);
        assert_eq!(outcome.final_org_ai_r, 54.0);
        assert_eq!(outcome.delta_org_ai_r, 0.0);
        assert_eq!(outcome.efficiency, 0.0);
    }

    #[test]
    fn benchmark_reports_rank() {
        let p = portfolio();
        let report = p.benchmark("Epsilon Tech").unwrap();
        assert_eq!(report.org_ai_r, 86.0);
        assert_eq!(report.percentile, 100.0);
        assert!(report.z_score > 0.0);
        let low = p.benchmark("Eta Food").unwrap();
        assert_eq!(low.percentile, 12.5);
        assert!(low.z_score < 0.0);
    }

    proptest! {
        #[test]
        fn efficiency_zero_without_investment(d in -100.0f64..100.0, inv in -10.0f64..=0.0, e in -10.0f64..10.0) {
            prop_assert_eq!(investment_efficiency(d, inv, e), 0.0);
        }

        #[test]
        fn percentile_monotonic(
            scores in proptest::collection::vec(0.0f64..100.0, 0..20),
            a in 0.0f64..100.0,
            b in 0.0f64..100.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percentile(lo, &scores) <= percentile(hi, &scores));
        }
    }
}
