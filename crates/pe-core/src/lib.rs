#![deny(warnings)]

//! Core domain models and invariants for the AI value-creation planner.
//!
//! This crate defines the serializable types shared by the scoring, planning
//! and session crates, the static parameter tables they read from, and the
//! boundary validation that keeps out-of-range user input away from the
//! calculators.

pub mod config;
pub mod domain;
pub mod tables;

pub use config::*;
pub use domain::*;
pub use tables::*;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when reference data or configuration is missing or malformed.
///
/// These are fatal to the current operation: a typo in a company, sector or
/// use-case name must surface instead of silently falling back to a default.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown sector: {0}")]
    UnknownSector(String),
    #[error("unknown company: {0}")]
    UnknownCompany(String),
    #[error("unknown use case {name:?} for sector {sector}")]
    UnknownUseCase { sector: Sector, name: String },
    /// A weight table must carry exactly one weight per dimension.
    #[error("weight table {table} has {found} of {expected} dimensions")]
    IncompleteWeights {
        table: String,
        found: usize,
        expected: usize,
    },
    #[error("weight table {table} sums to {sum}, expected 1.0")]
    WeightsNotNormalized { table: String, sum: f64 },
    #[error("missing {table} entry for sector {sector}")]
    MissingSectorEntry { table: &'static str, sector: Sector },
    #[error("invalid catalog entry {0}")]
    InvalidCatalogEntry(String),
    #[error("invalid coefficients: {0}")]
    InvalidCoefficients(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Range violations detected at the input boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Ratings must be within [1, 5].
    #[error("rating {0} is out of range [1, 5]")]
    RatingOutOfRange(u8),
    /// Scores must be within [0, 100].
    #[error("{field} score {value} is out of range [0, 100]")]
    ScoreOutOfRange { field: &'static str, value: f64 },
    /// Probabilities and quality factors must be within [0, 1].
    #[error("{field} {value} is out of range [0, 1]")]
    FractionOutOfRange { field: &'static str, value: f64 },
    /// Investment must be within [0.1, 10.0] $M.
    #[error("investment {0} $M is out of range [0.1, 10.0]")]
    InvestmentOutOfRange(f64),
    /// Planning horizon must be within [1, 5] years.
    #[error("planning horizon {0} is out of range [1, 5]")]
    HorizonOutOfRange(u8),
    /// Exit multiple must be within [1.0, 20.0].
    #[error("exit multiple {0} is out of range [1.0, 20.0]")]
    MultipleOutOfRange(f64),
    /// Numeric field must be finite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
}

/// Round to two decimal places.
///
/// Rounds the exact binary value of `value`, so `2.675` (stored just below
/// the midpoint) becomes `2.67`. Only exact binary halves such as `0.125`
/// round to even. The result lands on the nearest `f64` to the 2dp decimal,
/// so `54.00000000000001` becomes `54.0` with no binary noise.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Check that a 0..=100 score is finite and in range.
pub fn validate_score(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange { field, value });
    }
    Ok(value)
}

/// Check that a probability-like factor is finite and in [0, 1].
pub fn validate_fraction(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::FractionOutOfRange { field, value });
    }
    Ok(value)
}

/// Check a per-initiative investment override.
pub fn validate_investment(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite("investment"));
    }
    if !(0.1..=10.0).contains(&value) {
        return Err(ValidationError::InvestmentOutOfRange(value));
    }
    Ok(value)
}

/// Check a user-supplied base exit multiple.
pub fn validate_exit_multiple(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite("exit multiple"));
    }
    if !(1.0..=20.0).contains(&value) {
        return Err(ValidationError::MultipleOutOfRange(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round2_strips_float_noise() {
        assert_eq!(round2(54.000_000_000_000_01), 54.0);
        assert_eq!(round2(0.35 * 72.0), 25.2);
        assert_eq!(round2(1.234_9), 1.23);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn round2_rounds_the_stored_binary_value() {
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(7.515), 7.51);
        assert_eq!(round2(6.0 + 2.0 * 75.75 / 100.0), 7.51);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-2.675), -2.67);
    }

    #[test]
    fn score_bounds() {
        assert!(validate_score("visible", 0.0).is_ok());
        assert!(validate_score("visible", 100.0).is_ok());
        assert_eq!(
            validate_score("visible", 100.5),
            Err(ValidationError::ScoreOutOfRange {
                field: "visible",
                value: 100.5
            })
        );
        assert_eq!(
            validate_score("visible", f64::INFINITY),
            Err(ValidationError::NonFinite("visible"))
        );
    }

    #[test]
    fn investment_and_multiple_bounds() {
        assert!(validate_investment(0.1).is_ok());
        assert!(validate_investment(0.05).is_err());
        assert!(validate_investment(10.5).is_err());
        assert!(validate_exit_multiple(1.0).is_ok());
        assert!(validate_exit_multiple(20.0).is_ok());
        assert!(validate_exit_multiple(0.5).is_err());
        assert!(validate_exit_multiple(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn round2_is_within_half_cent(x in -10_000.0f64..10_000.0) {
            prop_assert!((round2(x) - x).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn fractions_in_unit_interval_pass(x in 0.0f64..=1.0) {
            prop_assert!(validate_fraction("prob_success", x).is_ok());
        }
    }
}
