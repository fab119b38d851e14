//! Core error types.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("group index {index} out of range ({len} groups)")]
    GroupIndexOutOfRange { index: usize, len: usize },
}
