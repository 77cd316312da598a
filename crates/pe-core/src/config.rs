//! Model coefficients and session defaults, loadable from YAML.

use crate::{validate_score, ConfigError, Horizon};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Coefficients of the readiness, screening and exit models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCoefficients {
    /// Weight on idiosyncratic readiness.
    pub alpha: f64,
    /// Synergy coefficient.
    pub beta: f64,
    /// Weight of external signals in the screening score.
    pub epsilon: f64,
    pub w1_exit: f64,
    pub w2_exit: f64,
    pub w3_exit: f64,
    /// AI premium added to the base exit multiple at Exit-AI-R = 100.
    pub delta_exit: f64,
}

impl Default for ModelCoefficients {
    fn default() -> Self {
        Self {
            alpha: 0.65,
            beta: 0.15,
            epsilon: 0.30,
            w1_exit: 0.35,
            w2_exit: 0.40,
            w3_exit: 0.25,
            delta_exit: 2.0,
        }
    }
}

impl ModelCoefficients {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            self.alpha,
            self.beta,
            self.epsilon,
            self.w1_exit,
            self.w2_exit,
            self.w3_exit,
            self.delta_exit,
        ];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidCoefficients(
                "coefficients must be finite and non-negative".to_string(),
            ));
        }
        if self.alpha > 1.0 {
            return Err(ConfigError::InvalidCoefficients(format!(
                "alpha {} exceeds 1.0",
                self.alpha
            )));
        }
        let exit_sum = self.w1_exit + self.w2_exit + self.w3_exit;
        if (exit_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidCoefficients(format!(
                "exit weights sum to {exit_sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// What the plan builder does with an initiative finishing after the horizon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// The initiative posts nothing within the horizon.
    #[default]
    Drop,
    /// The initiative posts its effect in the final year.
    ClampToHorizon,
}

/// Starting values for a fresh or restarted session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub company: String,
    pub baseline_v_org_r: f64,
    pub external_signals: f64,
    pub planning_horizon: Horizon,
    pub visible_score: f64,
    pub documented_score: f64,
    pub sustainable_score: f64,
    pub overrun_policy: OverrunPolicy,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            company: "Alpha Manufacturing".to_string(),
            baseline_v_org_r: 36.0,
            external_signals: 45.0,
            planning_horizon: Horizon::default(),
            visible_score: 75.0,
            documented_score: 80.0,
            sustainable_score: 70.0,
            overrun_policy: OverrunPolicy::Drop,
        }
    }
}

impl SessionDefaults {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scores = [
            ("baseline_v_org_r", self.baseline_v_org_r),
            ("external_signals", self.external_signals),
            ("visible", self.visible_score),
            ("documented", self.documented_score),
            ("sustainable", self.sustainable_score),
        ];
        for (field, value) in scores {
            validate_score(field, value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        }
        Ok(())
    }
}

/// Top-level planner configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub coefficients: ModelCoefficients,
    pub session: SessionDefaults,
}

impl PlannerConfig {
    /// Parse and validate a YAML document. Missing keys take defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: PlannerConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), "loaded planner config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coefficients.validate()?;
        self.session.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PlannerConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = PlannerConfig::from_yaml_str(
            "coefficients:\n  alpha: 0.5\nsession:\n  company: Epsilon Tech\n  planning_horizon: 5\n  overrun_policy: clamp_to_horizon\n",
        )
        .unwrap();
        assert_eq!(cfg.coefficients.alpha, 0.5);
        assert_eq!(cfg.coefficients.beta, 0.15);
        assert_eq!(cfg.session.company, "Epsilon Tech");
        assert_eq!(cfg.session.planning_horizon.years(), 5);
        assert_eq!(cfg.session.overrun_policy, OverrunPolicy::ClampToHorizon);
        assert_eq!(cfg.session.visible_score, 75.0);
    }

    #[test]
    fn out_of_range_horizon_is_a_parse_error() {
        let err = PlannerConfig::from_yaml_str("session:\n  planning_horizon: 9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn exit_weights_must_sum_to_one() {
        let err = PlannerConfig::from_yaml_str("coefficients:\n  w1_exit: 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCoefficients(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PlannerConfig::load("/nonexistent/planner.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
