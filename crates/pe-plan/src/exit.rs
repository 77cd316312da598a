//! Exit-readiness score and AI-adjusted exit multiple.

use pe_core::{round2, validate_score, ModelCoefficients, ValidationError};
use serde::{Deserialize, Serialize};

/// Buyer-facing AI scores, each 0..=100. Deserializing runs the same range
/// checks as [`ExitScores::new`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExitScores")]
pub struct ExitScores {
    pub visible: f64,
    pub documented: f64,
    pub sustainable: f64,
}

#[derive(Deserialize)]
struct RawExitScores {
    visible: f64,
    documented: f64,
    sustainable: f64,
}

impl ExitScores {
    pub fn new(visible: f64, documented: f64, sustainable: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            visible: validate_score("visible", visible)?,
            documented: validate_score("documented", documented)?,
            sustainable: validate_score("sustainable", sustainable)?,
        })
    }
}

impl TryFrom<RawExitScores> for ExitScores {
    type Error = ValidationError;

    fn try_from(raw: RawExitScores) -> Result<Self, Self::Error> {
        ExitScores::new(raw.visible, raw.documented, raw.sustainable)
    }
}

/// Exit-AI-R = w1·visible + w2·documented + w3·sustainable.
pub fn exit_readiness(scores: &ExitScores, coefficients: &ModelCoefficients) -> f64 {
    round2(
        coefficients.w1_exit * scores.visible
            + coefficients.w2_exit * scores.documented
            + coefficients.w3_exit * scores.sustainable,
    )
}

pub fn predicted_multiple(base_multiple: f64, exit_ai_r: f64, delta: f64) -> f64 {
    round2(base_multiple + delta * exit_ai_r / 100.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitAssessment {
    pub scores: ExitScores,
    pub exit_ai_r: f64,
    pub base_multiple: f64,
    pub predicted_multiple: f64,
    pub projected_ebitda_m: f64,
    pub implied_valuation_m: f64,
}

pub fn assess_exit(
    scores: ExitScores,
    base_multiple: f64,
    projected_ebitda_m: f64,
    coefficients: &ModelCoefficients,
) -> ExitAssessment {
    let exit_ai_r = exit_readiness(&scores, coefficients);
    let multiple = predicted_multiple(base_multiple, exit_ai_r, coefficients.delta_exit);
    ExitAssessment {
        scores,
        exit_ai_r,
        base_multiple,
        predicted_multiple: multiple,
        projected_ebitda_m,
        implied_valuation_m: round2(projected_ebitda_m * multiple),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_scenario() {
        let c = ModelCoefficients::default();
        let scores = ExitScores::new(75.0, 80.0, 70.0).unwrap();
        assert_eq!(exit_readiness(&scores, &c), 75.75);
        let a = assess_exit(scores, 6.0, 9.0, &c);
        assert_eq!(a.predicted_multiple, 7.51);
        assert_eq!(a.implied_valuation_m, 67.59);
    }

    #[test]
    fn zero_scores_keep_base_multiple() {
        let c = ModelCoefficients::default();
        let a = assess_exit(ExitScores::new(0.0, 0.0, 0.0).unwrap(), 8.0, 0.0, &c);
        assert_eq!(a.exit_ai_r, 0.0);
        assert_eq!(a.predicted_multiple, 8.0);
        assert_eq!(a.implied_valuation_m, 0.0);
    }

    #[test]
    fn full_scores_add_whole_premium() {
        let c = ModelCoefficients::default();
        let a = assess_exit(ExitScores::new(100.0, 100.0, 100.0).unwrap(), 10.0, 15.0, &c);
        assert_eq!(a.exit_ai_r, 100.0);
        assert_eq!(a.predicted_multiple, 12.0);
        assert_eq!(a.implied_valuation_m, 180.0);
    }

    #[test]
    fn scores_are_range_checked() {
        assert!(ExitScores::new(101.0, 50.0, 50.0).is_err());
        assert!(ExitScores::new(50.0, -1.0, 50.0).is_err());
    }

    #[test]
    fn deserialized_scores_are_range_checked() {
        let ok: ExitScores =
            serde_json::from_str(r#"{"visible":75,"documented":80,"sustainable":70}"#).unwrap();
        assert_eq!(ok, ExitScores::new(75.0, 80.0, 70.0).unwrap());
        let err = serde_json::from_str::<ExitScores>(
            r#"{"visible":5000,"documented":80,"sustainable":70}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("visible"), "{err}");
    }
}
