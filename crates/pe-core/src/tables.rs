//! Static parameter tables: sector opportunity scores, dimension weights,
//! use-case catalogs, base exit multiples and the seed portfolio.

use crate::{Company, Complexity, ConfigError, Dimension, DimensionWeights, Sector, UseCase};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the diagnostic use case whose catalog impact range is [0, 0].
pub const DIAGNOSTIC_USE_CASE: &str = "Diagnostic AI";

/// A seed-portfolio row before any plan has been committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSeed {
    pub company: Company,
    pub baseline_org_ai_r: f64,
    pub current_org_ai_r: f64,
    pub delta_org_ai_r: f64,
    pub investment_m: f64,
    pub ebitda_impact_pct: f64,
}

/// All lookup data the calculators read. Immutable for the life of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Systematic opportunity H_org_k_R per sector, 0..=100.
    pub opportunity: BTreeMap<Sector, f64>,
    pub general_weights: DimensionWeights,
    pub sector_weights: BTreeMap<Sector, DimensionWeights>,
    pub use_cases: BTreeMap<Sector, Vec<UseCase>>,
    pub base_multiples: BTreeMap<Sector, f64>,
    /// Use cases pre-selected when a company of the sector is chosen.
    pub default_use_cases: BTreeMap<Sector, Vec<String>>,
    pub portfolio: Vec<PortfolioSeed>,
}

impl ReferenceData {
    /// Systematic opportunity score for a sector.
    pub fn opportunity(&self, sector: Sector) -> Result<f64, ConfigError> {
        self.opportunity
            .get(&sector)
            .copied()
            .ok_or(ConfigError::MissingSectorEntry {
                table: "opportunity",
                sector,
            })
    }

    /// Dimension weights for a sector.
    pub fn weights(&self, sector: Sector) -> Result<&DimensionWeights, ConfigError> {
        self.sector_weights
            .get(&sector)
            .ok_or(ConfigError::MissingSectorEntry {
                table: "sector_weights",
                sector,
            })
    }

    pub fn catalog(&self, sector: Sector) -> Result<&[UseCase], ConfigError> {
        self.use_cases
            .get(&sector)
            .map(Vec::as_slice)
            .ok_or(ConfigError::MissingSectorEntry {
                table: "use_cases",
                sector,
            })
    }

    pub fn use_case(&self, sector: Sector, name: &str) -> Result<&UseCase, ConfigError> {
        self.catalog(sector)?
            .iter()
            .find(|uc| uc.name == name)
            .ok_or_else(|| ConfigError::UnknownUseCase {
                sector,
                name: name.to_string(),
            })
    }

    pub fn base_multiple(&self, sector: Sector) -> Result<f64, ConfigError> {
        self.base_multiples
            .get(&sector)
            .copied()
            .ok_or(ConfigError::MissingSectorEntry {
                table: "base_multiples",
                sector,
            })
    }

    pub fn default_use_cases(&self, sector: Sector) -> &[String] {
        self.default_use_cases
            .get(&sector)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn company(&self, name: &str) -> Result<&Company, ConfigError> {
        self.portfolio
            .iter()
            .map(|seed| &seed.company)
            .find(|c| c.name == name)
            .ok_or_else(|| ConfigError::UnknownCompany(name.to_string()))
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.portfolio.iter().map(|seed| &seed.company)
    }

    /// Validate the table invariants: every sector has an entry in each
    /// table, every weight table is complete and normalized, catalog ranges
    /// are ordered, default selections exist, company names are unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general_weights.validate("general")?;
        for sector in Sector::ALL {
            let h = self.opportunity(sector)?;
            if !(0.0..=100.0).contains(&h) {
                return Err(ConfigError::InvalidCatalogEntry(format!(
                    "opportunity for {sector} is {h}"
                )));
            }
            self.weights(sector)?.validate(sector.name())?;
            let multiple = self.base_multiple(sector)?;
            if !multiple.is_finite() || multiple <= 0.0 {
                return Err(ConfigError::InvalidCatalogEntry(format!(
                    "base multiple for {sector} is {multiple}"
                )));
            }
            for uc in self.catalog(sector)? {
                let finite = uc.impact_min_pct.is_finite() && uc.impact_max_pct.is_finite();
                let ordered = uc.impact_min_pct <= uc.impact_max_pct;
                if !finite || uc.impact_min_pct < 0.0 || !ordered || uc.name.trim().is_empty() {
                    return Err(ConfigError::InvalidCatalogEntry(uc.name.clone()));
                }
            }
            for name in self.default_use_cases(sector) {
                self.use_case(sector, name)?;
            }
        }
        let mut names = BTreeSet::new();
        for seed in &self.portfolio {
            if !names.insert(seed.company.name.as_str()) {
                return Err(ConfigError::InvalidCatalogEntry(format!(
                    "duplicate company {}",
                    seed.company.name
                )));
            }
        }
        Ok(())
    }

    /// The built-in tables.
    pub fn builtin() -> Self {
        use Sector::*;

        let weights = |w: [f64; 7]| -> DimensionWeights {
            Dimension::ALL.iter().copied().zip(w).collect()
        };

        let opportunity = BTreeMap::from([
            (Manufacturing, 72.0),
            (Healthcare, 78.0),
            (Retail, 75.0),
            (BusinessServices, 80.0),
            (Technology, 85.0),
        ]);

        // Order follows Dimension::ALL.
        let general_weights = weights([0.25, 0.20, 0.15, 0.15, 0.10, 0.10, 0.05]);
        let sector_weights = BTreeMap::from([
            (Manufacturing, weights([0.28, 0.15, 0.18, 0.15, 0.08, 0.12, 0.04])),
            (Healthcare, weights([0.28, 0.25, 0.12, 0.15, 0.08, 0.08, 0.04])),
            (Retail, weights([0.28, 0.12, 0.18, 0.14, 0.10, 0.13, 0.05])),
            (BusinessServices, weights([0.22, 0.18, 0.15, 0.20, 0.10, 0.10, 0.05])),
            (Technology, weights([0.22, 0.15, 0.20, 0.22, 0.08, 0.10, 0.03])),
        ]);

        let uc = |name: &str,
                  complexity: Complexity,
                  timeline: &str,
                  min: f64,
                  max: f64,
                  description: &str| UseCase {
            name: name.to_string(),
            complexity,
            timeline: timeline.to_string(),
            impact_min_pct: min,
            impact_max_pct: max,
            description: description.to_string(),
        };
        let use_cases = BTreeMap::from([
            (
                Manufacturing,
                vec![
                    uc("Predictive Maintenance", Complexity::Medium, "6-12", 2.0, 4.0,
                        "AI-driven equipment monitoring reducing unplanned downtime 15-25%"),
                    uc("Quality Control (CV)", Complexity::Medium, "6-9", 1.0, 3.0,
                        "Computer vision defect detection improving yield 5-10%"),
                    uc("Demand Forecasting", Complexity::LowMedium, "3-6", 1.0, 2.0,
                        "ML-based demand planning reducing inventory costs 10-20%"),
                    uc("Supply Chain Optimization", Complexity::High, "12-18", 2.0, 3.0,
                        "AI route optimization and supplier risk monitoring"),
                ],
            ),
            (
                Healthcare,
                vec![
                    uc("Revenue Cycle Management", Complexity::Medium, "6-9", 3.0, 5.0,
                        "AI-driven claims processing reducing denials 15-25%"),
                    uc("Clinical Documentation", Complexity::Medium, "6-12", 1.0, 2.0,
                        "NLP-powered coding improving accuracy and speed"),
                    uc("Patient Scheduling", Complexity::LowMedium, "3-6", 2.0, 3.0,
                        "Predictive scheduling reducing wait times, improving utilization"),
                    uc(DIAGNOSTIC_USE_CASE, Complexity::High, "12-24", 0.0, 0.0,
                        "AI imaging analysis (radiology, pathology). Variable impact."),
                ],
            ),
            (
                Retail,
                vec![
                    uc("Demand Forecasting", Complexity::Medium, "6-9", 1.0, 3.0,
                        "ML-powered inventory optimization"),
                    uc("Personalization", Complexity::Medium, "6-12", 0.5, 1.0,
                        "AI-driven product recommendations"),
                    uc("Dynamic Pricing", Complexity::High, "9-15", 1.0, 2.0,
                        "Real-time price optimization"),
                    uc("Customer Service Chatbot", Complexity::Low, "3-6", 0.5, 1.0,
                        "AI chatbots reducing contact center costs"),
                ],
            ),
            (
                BusinessServices,
                vec![
                    uc("Document Processing", Complexity::LowMedium, "3-6", 2.0, 4.0,
                        "AI extraction and analysis"),
                    uc("Knowledge Worker Tools", Complexity::Low, "1-3", 3.0, 5.0,
                        "Gen AI tools improving output"),
                    uc("Sales Enablement", Complexity::Medium, "6-9", 2.0, 3.0,
                        "AI-powered proposal generation"),
                    uc("Contract Analysis", Complexity::Medium, "6-9", 1.0, 2.0,
                        "AI review of legal/procurement documents"),
                ],
            ),
            (
                Technology,
                vec![
                    uc("Product AI Embedding", Complexity::High, "12-24", 5.0, 10.0,
                        "Embedding AI as core product features"),
                    uc("Automated Code Generation", Complexity::Medium, "6-12", 3.0, 6.0,
                        "AI assistance for software development"),
                    uc("Predictive Cybersecurity", Complexity::High, "9-18", 2.0, 4.0,
                        "AI for threat detection and prevention"),
                    uc("ML-driven DevOps", Complexity::Medium, "6-12", 1.0, 3.0,
                        "AI for optimizing deployment pipelines"),
                ],
            ),
        ]);

        let base_multiples = BTreeMap::from([
            (Manufacturing, 6.0),
            (Healthcare, 7.5),
            (Retail, 5.5),
            (BusinessServices, 8.0),
            (Technology, 10.0),
        ]);

        let defaults = |a: &str, b: &str| vec![a.to_string(), b.to_string()];
        let default_use_cases = BTreeMap::from([
            (Manufacturing, defaults("Predictive Maintenance", "Demand Forecasting")),
            (Healthcare, defaults("Revenue Cycle Management", "Patient Scheduling")),
            (Retail, defaults("Demand Forecasting", "Personalization")),
            (BusinessServices, defaults("Document Processing", "Knowledge Worker Tools")),
            (Technology, defaults("Product AI Embedding", "Automated Code Generation")),
        ]);

        let seed = |name: &str,
                    sector: Sector,
                    baseline: f64,
                    current: f64,
                    delta: f64,
                    investment: f64,
                    pct: f64,
                    ebitda: f64| {
            PortfolioSeed {
                company: Company {
                    name: name.to_string(),
                    sector,
                    ebitda_m: ebitda,
                },
                baseline_org_ai_r: baseline,
                current_org_ai_r: current,
                delta_org_ai_r: delta,
                investment_m: investment,
                ebitda_impact_pct: pct,
            }
        };
        let portfolio = vec![
            seed("Alpha Manufacturing", Manufacturing, 42.0, 68.0, 26.0, 2.8, 6.0, 9.0),
            seed("Beta Healthcare", Healthcare, 48.0, 71.0, 23.0, 3.2, 5.0, 8.0),
            seed("Gamma Retail", Retail, 44.0, 62.0, 18.0, 2.4, 3.0, 12.0),
            seed("Delta Services", BusinessServices, 62.0, 79.0, 17.0, 2.1, 8.0, 7.5),
            seed("Epsilon Tech", Technology, 75.0, 86.0, 11.0, 1.5, 4.0, 15.0),
            seed("Zeta Logistics", Manufacturing, 38.0, 58.0, 20.0, 1.9, 4.0, 6.0),
            seed("Eta Food", Retail, 35.0, 52.0, 17.0, 2.0, 3.0, 10.0),
            seed("Theta Finance", BusinessServices, 68.0, 82.0, 14.0, 1.8, 5.0, 11.0),
        ];

        Self {
            opportunity,
            general_weights,
            sector_weights,
            use_cases,
            base_multiples,
            default_use_cases,
            portfolio,
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_valid() {
        ReferenceData::builtin().validate().unwrap();
    }

    #[test]
    fn lookups_fail_loudly_on_typos() {
        let data = ReferenceData::builtin();
        assert_eq!(
            data.company("Alpha Manufactoring"),
            Err(ConfigError::UnknownCompany("Alpha Manufactoring".to_string()))
        );
        assert!(matches!(
            data.use_case(Sector::Retail, "Predictive Maintenance"),
            Err(ConfigError::UnknownUseCase { .. })
        ));
    }

    #[test]
    fn sector_lookups() {
        let data = ReferenceData::builtin();
        assert_eq!(data.opportunity(Sector::Manufacturing), Ok(72.0));
        assert_eq!(data.base_multiple(Sector::Technology), Ok(10.0));
        assert_eq!(data.catalog(Sector::Healthcare).map(<[UseCase]>::len), Ok(4));
        let company = data.company("Delta Services").unwrap();
        assert_eq!(company.sector, Sector::BusinessServices);
        assert_eq!(company.ebitda_m, 7.5);
    }

    #[test]
    fn missing_sector_entry_is_reported() {
        let mut data = ReferenceData::builtin();
        data.base_multiples.remove(&Sector::Retail);
        assert_eq!(
            data.validate(),
            Err(ConfigError::MissingSectorEntry {
                table: "base_multiples",
                sector: Sector::Retail,
            })
        );
    }

    #[test]
    fn non_finite_impact_range_is_rejected() {
        let mut data = ReferenceData::builtin();
        let entry = data
            .use_cases
            .get_mut(&Sector::Healthcare)
            .and_then(|c| c.first_mut())
            .unwrap();
        entry.impact_max_pct = f64::INFINITY;
        let name = entry.name.clone();
        assert_eq!(data.validate(), Err(ConfigError::InvalidCatalogEntry(name)));

        let mut data = ReferenceData::builtin();
        data.base_multiples.insert(Sector::Retail, f64::NAN);
        assert!(matches!(
            data.validate(),
            Err(ConfigError::InvalidCatalogEntry(_))
        ));
    }

    #[test]
    fn unknown_default_use_case_is_rejected() {
        let mut data = ReferenceData::builtin();
        data.default_use_cases
            .insert(Sector::Technology, vec!["Quantum Ledger".to_string()]);
        assert!(matches!(
            data.validate(),
            Err(ConfigError::UnknownUseCase { .. })
        ));
    }
}
