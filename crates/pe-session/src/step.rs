//! The six ordered workflow steps.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    CompanySelection,
    DimensionAssessment,
    UseCasePlanning,
    MultiYearPlan,
    Benchmarking,
    ExitReadiness,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::CompanySelection,
        Step::DimensionAssessment,
        Step::UseCasePlanning,
        Step::MultiYearPlan,
        Step::Benchmarking,
        Step::ExitReadiness,
    ];

    /// 1-based position.
    pub fn number(self) -> u8 {
        match self {
            Step::CompanySelection => 1,
            Step::DimensionAssessment => 2,
            Step::UseCasePlanning => 3,
            Step::MultiYearPlan => 4,
            Step::Benchmarking => 5,
            Step::ExitReadiness => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::CompanySelection => "Company Selection",
            Step::DimensionAssessment => "Dimension Assessment",
            Step::UseCasePlanning => "Use Case Planning",
            Step::MultiYearPlan => "Multi-Year Plan",
            Step::Benchmarking => "Benchmarking",
            Step::ExitReadiness => "Exit Readiness",
        }
    }

    /// The following step; the last step stays put.
    pub fn next(self) -> Step {
        Step::ALL
            .get(usize::from(self.number()))
            .copied()
            .unwrap_or(self)
    }

    /// The preceding step; the first step stays put.
    pub fn prev(self) -> Step {
        match self.number() {
            1 => self,
            n => Step::ALL[usize::from(n) - 2],
        }
    }

    /// e.g. "3 of 6: Use Case Planning".
    pub fn progress_label(self) -> String {
        format!("{} of {}: {}", self.number(), Step::ALL.len(), self.title())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
