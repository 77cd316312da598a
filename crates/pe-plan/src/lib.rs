#![deny(warnings)]

//! Planning models: multi-year trajectories, investment efficiency,
//! portfolio benchmarking and exit valuation.

pub mod benchmark;
pub mod exit;
pub mod plan;

pub use benchmark::*;
pub use exit::*;
pub use plan::*;
