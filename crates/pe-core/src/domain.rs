//! Domain entities: sectors, readiness dimensions, companies, use cases,
//! planned initiatives and portfolio rows.

use crate::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Industry sector of a portfolio company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Manufacturing,
    Healthcare,
    Retail,
    #[serde(rename = "Business Services")]
    BusinessServices,
    Technology,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Manufacturing,
        Sector::Healthcare,
        Sector::Retail,
        Sector::BusinessServices,
        Sector::Technology,
    ];

    /// Display name, also used as seed material for the rating simulator.
    pub fn name(self) -> &'static str {
        match self {
            Sector::Manufacturing => "Manufacturing",
            Sector::Healthcare => "Healthcare",
            Sector::Retail => "Retail",
            Sector::BusinessServices => "Business Services",
            Sector::Technology => "Technology",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownSector(s.to_string()))
    }
}

/// The seven AI-readiness dimensions, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "Data Infrastructure")]
    DataInfrastructure,
    #[serde(rename = "AI Governance")]
    AiGovernance,
    #[serde(rename = "Technology Stack")]
    TechnologyStack,
    Talent,
    Leadership,
    #[serde(rename = "Use Case Portfolio")]
    UseCasePortfolio,
    Culture,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::DataInfrastructure,
        Dimension::AiGovernance,
        Dimension::TechnologyStack,
        Dimension::Talent,
        Dimension::Leadership,
        Dimension::UseCasePortfolio,
        Dimension::Culture,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::DataInfrastructure => "Data Infrastructure",
            Dimension::AiGovernance => "AI Governance",
            Dimension::TechnologyStack => "Technology Stack",
            Dimension::Talent => "Talent",
            Dimension::Leadership => "Leadership",
            Dimension::UseCasePortfolio => "Use Case Portfolio",
            Dimension::Culture => "Culture",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a rating describes today's capability or the desired future state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingKind {
    Current,
    Target,
}

impl RatingKind {
    pub fn is_target(self) -> bool {
        matches!(self, RatingKind::Target)
    }
}

/// A 1..=5 maturity rating for one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Clamp an arbitrary value into 1..=5.
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self {
        r.0
    }
}

/// Ratings keyed by dimension. Dimensions absent from the map score 0.
pub type DimensionRatings = BTreeMap<Dimension, Rating>;

/// Per-dimension weights in [0, 1] summing to 1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionWeights(BTreeMap<Dimension, f64>);

impl DimensionWeights {
    pub fn new(weights: BTreeMap<Dimension, f64>) -> Self {
        Self(weights)
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(d, w)| (*d, *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Require exactly one weight per dimension.
    pub fn ensure_complete(&self, table: &str) -> Result<(), ConfigError> {
        let found = Dimension::ALL
            .iter()
            .filter(|d| self.0.contains_key(*d))
            .count();
        if found != Dimension::ALL.len() {
            return Err(ConfigError::IncompleteWeights {
                table: table.to_string(),
                found,
                expected: Dimension::ALL.len(),
            });
        }
        Ok(())
    }

    /// Complete, each weight in [0, 1], total within 1e-3 of 1.0.
    pub fn validate(&self, table: &str) -> Result<(), ConfigError> {
        self.ensure_complete(table)?;
        let sum = self.sum();
        let in_range = self.0.values().all(|w| w.is_finite() && (0.0..=1.0).contains(w));
        if !in_range || (sum - 1.0).abs() > 1e-3 {
            return Err(ConfigError::WeightsNotNormalized {
                table: table.to_string(),
                sum,
            });
        }
        Ok(())
    }
}

impl FromIterator<(Dimension, f64)> for DimensionWeights {
    fn from_iter<T: IntoIterator<Item = (Dimension, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A portfolio company as reference data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub sector: Sector,
    /// Base EBITDA in $M.
    pub ebitda_m: f64,
}

/// Implementation complexity tier of a use case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    High,
}

impl Complexity {
    pub fn label(self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::LowMedium => "Low-Medium",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry for a sector-specific AI use case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    pub name: String,
    pub complexity: Complexity,
    /// Timeline bucket label in months, e.g. "6-12".
    pub timeline: String,
    pub impact_min_pct: f64,
    pub impact_max_pct: f64,
    pub description: String,
}

/// A selected use case with its estimated or overridden parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub use_case: String,
    pub complexity: Complexity,
    /// Average duration in months for the use case's timeline bucket.
    pub timeline_months: f64,
    pub investment_m: f64,
    pub prob_success: f64,
    pub exec_quality: f64,
    pub ebitda_impact_pct: f64,
    pub ebitda_impact_m: f64,
    pub delta_org_ai_r: f64,
}

/// One row of the portfolio benchmark table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub company: String,
    pub sector: Sector,
    pub baseline_org_ai_r: f64,
    pub current_org_ai_r: f64,
    pub delta_org_ai_r: f64,
    pub investment_m: f64,
    /// AI investment efficiency, points × $M per $M.
    pub efficiency: f64,
    pub ebitda_impact_pct: f64,
    /// EBITDA before any committed plan; kept so repeated commits do not compound.
    pub baseline_ebitda_m: f64,
    pub ebitda_m: f64,
    pub ebitda_impact_m: f64,
}

/// Planning horizon in years, 1..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Horizon(u8);

impl Horizon {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(years: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&years) {
            return Err(ValidationError::HorizonOutOfRange(years));
        }
        Ok(Self(years))
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Horizon {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Horizon::new(value)
    }
}

impl From<Horizon> for u8 {
    fn from(h: Horizon) -> Self {
        h.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parses_display_names() {
        assert_eq!("Business Services".parse::<Sector>(), Ok(Sector::BusinessServices));
        assert_eq!("technology".parse::<Sector>(), Ok(Sector::Technology));
        assert_eq!(
            "Agriculture".parse::<Sector>(),
            Err(ConfigError::UnknownSector("Agriculture".to_string()))
        );
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(5).map(Rating::value), Ok(5));
        assert_eq!(Rating::new(6), Err(ValidationError::RatingOutOfRange(6)));
        assert_eq!(Rating::clamped(0).value(), 1);
        assert_eq!(Rating::clamped(9).value(), 5);
    }

    #[test]
    fn rating_rejects_out_of_range_on_deserialize() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn horizon_bounds() {
        assert_eq!(Horizon::default().years(), 3);
        assert!(Horizon::new(0).is_err());
        assert!(Horizon::new(6).is_err());
        assert_eq!(Horizon::new(5).map(Horizon::years), Ok(5));
    }

    #[test]
    fn weights_must_cover_every_dimension() {
        let partial: DimensionWeights = [(Dimension::Talent, 1.0)].into_iter().collect();
        assert_eq!(
            partial.validate("partial"),
            Err(ConfigError::IncompleteWeights {
                table: "partial".to_string(),
                found: 1,
                expected: 7,
            })
        );
        let even: DimensionWeights = Dimension::ALL.iter().map(|d| (*d, 0.2)).collect();
        assert!(matches!(
            even.validate("even"),
            Err(ConfigError::WeightsNotNormalized { .. })
        ));
    }

    #[test]
    fn complexity_labels_match_catalog_tiers() {
        for c in [
            Complexity::Low,
            Complexity::LowMedium,
            Complexity::Medium,
            Complexity::High,
        ] {
            let parsed: Complexity = serde_yaml::from_str(c.label()).unwrap();
            assert_eq!(parsed, c);
        }
    }

    #[test]
    fn unknown_complexity_tier_is_a_parse_error() {
        let yaml = "name: Quantum Routing\ncomplexity: Extreme\ntimeline: 6-12\n\
                    impact_min_pct: 1.0\nimpact_max_pct: 2.0\ndescription: x\n";
        let err: ConfigError = serde_yaml::from_str::<UseCase>(yaml).unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
