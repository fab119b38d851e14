//! Engine error types.

use thiserror::Error;

/// Caller-contract violations. Conflicting or unknown constraints are not
/// errors; they are dropped during resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
