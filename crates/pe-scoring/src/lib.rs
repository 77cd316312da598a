#![deny(warnings)]

//! Scoring models for the planner.
//!
//! This crate provides:
//! - Deterministic readiness and screening formulas (V_org_R, synergy, Org-AI-R)
//! - Seeded default dimension ratings keyed by a stable string hash
//! - Initiative parameter estimation with optional user overrides

pub mod estimate;
pub mod readiness;
pub mod simulate;

pub use estimate::*;
pub use readiness::*;
pub use simulate::*;
