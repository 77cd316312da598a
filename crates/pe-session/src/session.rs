//! Session context and the controller that owns it.
//!
//! All state lives in [`SessionContext`]. [`Session`] is the only writer and
//! every transition recomputes exactly the fields that depend on the input it
//! changed before returning.

use crate::{SessionError, Step};
use pe_core::{
    validate_exit_multiple, validate_score, Company, Dimension, DimensionRatings, Horizon,
    Initiative, OverrunPolicy, PlannerConfig, Rating, RatingKind, ReferenceData, Sector,
};
use pe_plan::{
    assess_exit, build_plan, BenchmarkReport, ExitAssessment, ExitScores, PlanOutcome,
    PlanTrajectory, Portfolio,
};
use pe_scoring::{
    assess_readiness, estimate_initiative, gap_analysis, screen, simulate_dimension_ratings,
    EstimationContext, GapRow, InitiativeOverrides, ReadinessBreakdown, ScreeningView,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Shown on the plan step when no initiative is selected.
pub const EMPTY_PLAN_NOTICE: &str =
    "No initiatives selected. Select at least one use case to build a multi-year plan.";

/// Everything a session knows. Serializable so a session can be snapshotted
/// and restored against the same reference data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub step: Step,
    pub company: String,
    pub sector: Sector,
    /// Base EBITDA of the company from reference data, $M.
    pub base_ebitda_m: f64,
    pub baseline_v_org_r: f64,
    pub external_signals: f64,
    pub current_ratings: DimensionRatings,
    pub target_ratings: DimensionRatings,
    pub readiness: ReadinessBreakdown,
    pub target_readiness: ReadinessBreakdown,
    pub selected_use_cases: Vec<String>,
    pub overrides: BTreeMap<String, InitiativeOverrides>,
    pub initiatives: Vec<Initiative>,
    pub horizon: Horizon,
    pub overrun_policy: OverrunPolicy,
    /// `None` while no initiative is selected.
    pub plan: Option<PlanTrajectory>,
    pub portfolio: Portfolio,
    pub exit_scores: ExitScores,
    pub base_multiple: f64,
}

/// Company-dependent state, computed in full before any of it is assigned.
struct CompanyState {
    company: Company,
    current: DimensionRatings,
    target: DimensionRatings,
    readiness: ReadinessBreakdown,
    target_readiness: ReadinessBreakdown,
    use_cases: Vec<String>,
    base_multiple: f64,
}

impl CompanyState {
    fn load(reference: &ReferenceData, config: &PlannerConfig, name: &str) -> Result<Self, SessionError> {
        let company = reference.company(name)?.clone();
        let sector = company.sector;
        let weights = reference.weights(sector)?;
        let h = reference.opportunity(sector)?;
        let current = simulate_dimension_ratings(&company.name, sector, RatingKind::Current);
        let target = simulate_dimension_ratings(&company.name, sector, RatingKind::Target);
        let readiness = assess_readiness(&current, weights, h, &config.coefficients)?;
        let target_readiness = assess_readiness(&target, weights, h, &config.coefficients)?;
        Ok(Self {
            use_cases: reference.default_use_cases(sector).to_vec(),
            base_multiple: reference.base_multiple(sector)?,
            company,
            current,
            target,
            readiness,
            target_readiness,
        })
    }
}

/// Single-user controller for the six-step planning workflow.
#[derive(Clone, Debug)]
pub struct Session {
    reference: ReferenceData,
    config: PlannerConfig,
    ctx: SessionContext,
}

impl Session {
    pub fn new(reference: ReferenceData, config: PlannerConfig) -> Result<Self, SessionError> {
        reference.validate()?;
        config.validate()?;
        let ctx = fresh_context(&reference, &config)?;
        let mut session = Self {
            reference,
            config,
            ctx,
        };
        session.refresh_initiatives()?;
        info!(company = %session.ctx.company, "session started");
        Ok(session)
    }

    /// Built-in reference data with default configuration.
    pub fn with_defaults() -> Result<Self, SessionError> {
        Self::new(ReferenceData::builtin(), PlannerConfig::default())
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Clear every session-scoped value, reseed the portfolio and reselect
    /// the default company. Nothing is replaced unless the fresh state builds.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let mut ctx = fresh_context(&self.reference, &self.config)?;
        std::mem::swap(&mut self.ctx, &mut ctx);
        if let Err(e) = self.refresh_initiatives() {
            self.ctx = ctx;
            return Err(e);
        }
        info!(company = %self.ctx.company, "session restarted");
        Ok(())
    }

    // Navigation

    pub fn step(&self) -> Step {
        self.ctx.step
    }

    pub fn advance(&mut self) -> Step {
        self.ctx.step = self.ctx.step.next();
        debug!(step = %self.ctx.step, "advanced");
        self.ctx.step
    }

    pub fn back(&mut self) -> Step {
        self.ctx.step = self.ctx.step.prev();
        debug!(step = %self.ctx.step, "went back");
        self.ctx.step
    }

    pub fn progress_label(&self) -> String {
        self.ctx.step.progress_label()
    }

    // Step 1: company and screening

    /// Switch the active company.
    ///
    /// Ratings are re-simulated, default use cases reselected, overrides
    /// discarded and the base exit multiple returned to the sector default.
    /// Selecting the active company is a no-op.
    pub fn select_company(&mut self, name: &str) -> Result<(), SessionError> {
        if name == self.ctx.company {
            debug!(company = name, "company already active");
            return Ok(());
        }
        let state = CompanyState::load(&self.reference, &self.config, name)?;
        self.ctx.company = state.company.name;
        self.ctx.sector = state.company.sector;
        self.ctx.base_ebitda_m = state.company.ebitda_m;
        self.ctx.current_ratings = state.current;
        self.ctx.target_ratings = state.target;
        self.ctx.readiness = state.readiness;
        self.ctx.target_readiness = state.target_readiness;
        self.ctx.selected_use_cases = state.use_cases;
        self.ctx.overrides.clear();
        self.ctx.base_multiple = state.base_multiple;
        self.refresh_initiatives()?;
        info!(
            company = %self.ctx.company,
            sector = %self.ctx.sector,
            org_ai_r = self.ctx.readiness.org_ai_r,
            "company selected"
        );
        Ok(())
    }

    pub fn set_baseline_v_org_r(&mut self, value: f64) -> Result<ScreeningView, SessionError> {
        self.ctx.baseline_v_org_r = validate_score("baseline V_org_R", value)?;
        self.screening()
    }

    pub fn set_external_signals(&mut self, value: f64) -> Result<ScreeningView, SessionError> {
        self.ctx.external_signals = validate_score("external signals", value)?;
        self.screening()
    }

    pub fn screening(&self) -> Result<ScreeningView, SessionError> {
        let h = self.reference.opportunity(self.ctx.sector)?;
        Ok(screen(
            self.ctx.baseline_v_org_r,
            h,
            self.ctx.external_signals,
            &self.config.coefficients,
        ))
    }

    // Step 2: dimension assessment

    /// Replace one rating. A current-rating edit also re-estimates the
    /// initiatives and rebuilds the plan, both of which read V_org_R.
    pub fn set_rating(
        &mut self,
        kind: RatingKind,
        dimension: Dimension,
        value: u8,
    ) -> Result<ReadinessBreakdown, SessionError> {
        let rating = Rating::new(value)?;
        let weights = self.reference.weights(self.ctx.sector)?;
        let h = self.reference.opportunity(self.ctx.sector)?;
        let ratings = match kind {
            RatingKind::Current => &mut self.ctx.current_ratings,
            RatingKind::Target => &mut self.ctx.target_ratings,
        };
        ratings.insert(dimension, rating);
        let breakdown = assess_readiness(ratings, weights, h, &self.config.coefficients)?;
        match kind {
            RatingKind::Current => {
                self.ctx.readiness = breakdown;
                self.refresh_initiatives()?;
            }
            RatingKind::Target => self.ctx.target_readiness = breakdown,
        }
        debug!(%dimension, ?kind, value, v_org_r = breakdown.v_org_r, "rating updated");
        Ok(breakdown)
    }

    pub fn readiness(&self) -> &ReadinessBreakdown {
        &self.ctx.readiness
    }

    pub fn target_readiness(&self) -> &ReadinessBreakdown {
        &self.ctx.target_readiness
    }

    pub fn gap_analysis(&self) -> Vec<GapRow> {
        gap_analysis(&self.ctx.current_ratings, &self.ctx.target_ratings)
    }

    // Step 3: use cases and initiatives

    pub fn select_use_case(&mut self, name: &str) -> Result<&Initiative, SessionError> {
        self.reference.use_case(self.ctx.sector, name)?;
        if !self.ctx.selected_use_cases.iter().any(|n| n == name) {
            self.ctx.selected_use_cases.push(name.to_string());
            self.refresh_initiatives()?;
        }
        self.initiative(name)
    }

    /// Remove a use case and its overrides. Returns whether it was selected.
    pub fn deselect_use_case(&mut self, name: &str) -> Result<bool, SessionError> {
        let before = self.ctx.selected_use_cases.len();
        self.ctx.selected_use_cases.retain(|n| n != name);
        if self.ctx.selected_use_cases.len() == before {
            return Ok(false);
        }
        self.ctx.overrides.remove(name);
        self.refresh_initiatives()?;
        Ok(true)
    }

    /// Replace the whole selection. Duplicates collapse onto their first
    /// occurrence; overrides of use cases that stay selected are kept.
    pub fn set_use_cases<I, S>(&mut self, names: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            self.reference.use_case(self.ctx.sector, &name)?;
            if !selection.contains(&name) {
                selection.push(name);
            }
        }
        self.ctx.overrides.retain(|k, _| selection.contains(k));
        self.ctx.selected_use_cases = selection;
        self.refresh_initiatives()
    }

    /// Layer user values on top of the estimates for a selected use case.
    pub fn override_initiative(
        &mut self,
        name: &str,
        overrides: InitiativeOverrides,
    ) -> Result<&Initiative, SessionError> {
        overrides.validate()?;
        if !self.ctx.selected_use_cases.iter().any(|n| n == name) {
            return Err(SessionError::NotSelected(name.to_string()));
        }
        let merged = self
            .ctx
            .overrides
            .get(name)
            .copied()
            .unwrap_or_default()
            .merge(overrides);
        self.ctx.overrides.insert(name.to_string(), merged);
        self.refresh_initiatives()?;
        self.initiative(name)
    }

    /// Drop the user values for a use case and return to the estimates.
    pub fn clear_overrides(&mut self, name: &str) -> Result<(), SessionError> {
        if self.ctx.overrides.remove(name).is_some() {
            self.refresh_initiatives()?;
        }
        Ok(())
    }

    pub fn initiatives(&self) -> &[Initiative] {
        &self.ctx.initiatives
    }

    fn initiative(&self, name: &str) -> Result<&Initiative, SessionError> {
        self.ctx
            .initiatives
            .iter()
            .find(|i| i.use_case == name)
            .ok_or_else(|| SessionError::NotSelected(name.to_string()))
    }

    fn refresh_initiatives(&mut self) -> Result<(), SessionError> {
        let estimation = EstimationContext {
            v_org_r: self.ctx.readiness.v_org_r,
            h_org_k_r: self.ctx.readiness.h_org_k_r,
            base_ebitda_m: self.ctx.base_ebitda_m,
        };
        let mut initiatives = Vec::with_capacity(self.ctx.selected_use_cases.len());
        for name in &self.ctx.selected_use_cases {
            let use_case = self.reference.use_case(self.ctx.sector, name)?;
            let overrides = self.ctx.overrides.get(name).copied().unwrap_or_default();
            initiatives.push(estimate_initiative(use_case, &estimation, &overrides));
        }
        self.ctx.initiatives = initiatives;
        self.rebuild_plan();
        Ok(())
    }

    // Step 4: multi-year plan

    pub fn set_horizon(&mut self, years: u8) -> Result<Option<&PlanTrajectory>, SessionError> {
        self.ctx.horizon = Horizon::new(years)?;
        self.rebuild_plan();
        Ok(self.ctx.plan.as_ref())
    }

    pub fn set_overrun_policy(&mut self, policy: OverrunPolicy) -> Option<&PlanTrajectory> {
        self.ctx.overrun_policy = policy;
        self.rebuild_plan();
        self.ctx.plan.as_ref()
    }

    pub fn plan(&self) -> Option<&PlanTrajectory> {
        self.ctx.plan.as_ref()
    }

    /// The empty-state notice when there is nothing to plan.
    pub fn plan_notice(&self) -> Option<&'static str> {
        self.ctx.plan.is_none().then_some(EMPTY_PLAN_NOTICE)
    }

    pub fn plan_outcome(&self) -> PlanOutcome {
        PlanOutcome::from_plan(self.ctx.readiness.org_ai_r, self.ctx.plan.as_ref())
    }

    fn rebuild_plan(&mut self) {
        if self.ctx.initiatives.is_empty() {
            debug!(company = %self.ctx.company, "no initiatives selected, plan cleared");
            self.ctx.plan = None;
            return;
        }
        let plan = build_plan(
            &self.ctx.initiatives,
            self.ctx.readiness.org_ai_r,
            self.ctx.horizon,
            self.ctx.overrun_policy,
        );
        debug!(
            years = plan.years.len(),
            final_org_ai_r = plan.final_org_ai_r(),
            dropped = plan.dropped.len(),
            "plan rebuilt"
        );
        self.ctx.plan = Some(plan);
    }

    // Step 5: benchmarking

    /// Write the plan outcome over the active company's portfolio row and
    /// benchmark it. Committing again overwrites the row again.
    pub fn commit_plan(&mut self) -> Result<BenchmarkReport, SessionError> {
        let outcome = self.plan_outcome();
        self.ctx.portfolio.commit_plan(&self.ctx.company, &outcome)?;
        Ok(self.ctx.portfolio.benchmark(&self.ctx.company)?)
    }

    /// Benchmark the active company's row as it currently stands.
    pub fn benchmark(&self) -> Result<BenchmarkReport, SessionError> {
        Ok(self.ctx.portfolio.benchmark(&self.ctx.company)?)
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.ctx.portfolio
    }

    // Step 6: exit readiness

    pub fn set_exit_scores(
        &mut self,
        visible: f64,
        documented: f64,
        sustainable: f64,
    ) -> Result<ExitAssessment, SessionError> {
        self.ctx.exit_scores = ExitScores::new(visible, documented, sustainable)?;
        self.exit_assessment()
    }

    pub fn set_base_multiple(&mut self, multiple: f64) -> Result<ExitAssessment, SessionError> {
        self.ctx.base_multiple = validate_exit_multiple(multiple)?;
        self.exit_assessment()
    }

    /// Valuation against the active company's current EBITDA, which includes
    /// any committed plan impact.
    pub fn exit_assessment(&self) -> Result<ExitAssessment, SessionError> {
        let projected = self.ctx.portfolio.get(&self.ctx.company)?.ebitda_m;
        Ok(assess_exit(
            self.ctx.exit_scores,
            self.ctx.base_multiple,
            projected,
            &self.config.coefficients,
        ))
    }

    // Snapshots

    pub fn snapshot_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(&self.ctx)?)
    }

    /// Restore a snapshot. The company and every selected use case must
    /// exist in `reference`.
    pub fn from_snapshot(
        reference: ReferenceData,
        config: PlannerConfig,
        json: &str,
    ) -> Result<Self, SessionError> {
        reference.validate()?;
        config.validate()?;
        let ctx: SessionContext = serde_json::from_str(json)?;
        validate_score("baseline V_org_R", ctx.baseline_v_org_r)?;
        validate_score("external signals", ctx.external_signals)?;
        validate_exit_multiple(ctx.base_multiple)?;
        for overrides in ctx.overrides.values() {
            overrides.validate()?;
        }
        let company = reference.company(&ctx.company)?;
        if company.sector != ctx.sector {
            return Err(SessionError::SnapshotMismatch(format!(
                "{} is in {}, snapshot says {}",
                company.name, company.sector, ctx.sector
            )));
        }
        for name in &ctx.selected_use_cases {
            reference.use_case(ctx.sector, name)?;
        }
        if ctx.portfolio.len() != reference.portfolio.len() {
            return Err(SessionError::SnapshotMismatch(format!(
                "portfolio has {} rows, reference data has {}",
                ctx.portfolio.len(),
                reference.portfolio.len()
            )));
        }
        info!(company = %ctx.company, step = %ctx.step, "session restored");
        Ok(Self {
            reference,
            config,
            ctx,
        })
    }
}

fn fresh_context(reference: &ReferenceData, config: &PlannerConfig) -> Result<SessionContext, SessionError> {
    let defaults = &config.session;
    let state = CompanyState::load(reference, config, &defaults.company)?;
    Ok(SessionContext {
        step: Step::default(),
        sector: state.company.sector,
        base_ebitda_m: state.company.ebitda_m,
        company: state.company.name,
        baseline_v_org_r: defaults.baseline_v_org_r,
        external_signals: defaults.external_signals,
        current_ratings: state.current,
        target_ratings: state.target,
        readiness: state.readiness,
        target_readiness: state.target_readiness,
        selected_use_cases: state.use_cases,
        overrides: BTreeMap::new(),
        initiatives: Vec::new(),
        horizon: defaults.planning_horizon,
        overrun_policy: defaults.overrun_policy,
        plan: None,
        portfolio: Portfolio::from_seeds(&reference.portfolio),
        exit_scores: ExitScores::new(
            defaults.visible_score,
            defaults.documented_score,
            defaults.sustainable_score,
        )?,
        base_multiple: state.base_multiple,
    })
}
