#![deny(warnings)]

//! Session state machine for the six-step planning workflow.
//!
//! A [`Session`] owns one serializable [`SessionContext`] and mutates it only
//! through transition methods (select company, edit rating, select use case,
//! change horizon, commit plan, advance step). Each transition recomputes the
//! values that depend on its input before it returns.

pub mod session;
pub mod step;

pub use session::*;
pub use step::*;

use pe_core::{ConfigError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("use case {0} is not selected")]
    NotSelected(String),
    #[error("snapshot does not match reference data: {0}")]
    SnapshotMismatch(String),
    #[error("snapshot encoding: {0}")]
    Snapshot(#[from] serde_json::Error),
}
