//! Roster error types.

use thiserror::Error;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}
