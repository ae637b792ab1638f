//! src/errors.rs

use thiserror::Error;

/// Error taxonomy for the path search core.
///
/// `InvalidInput` and `PrecisionViolation` are raised eagerly and always
/// propagate; they are never swallowed inside the engine loop. Legitimate
/// search pruning (capacity exhausted, tolerance exceeded, dominated state)
/// is not represented here at all — it is normal control flow, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("precision violation: {0}")]
    PrecisionViolation(String),

    #[error("search guard limit exceeded: {0}")]
    GuardLimitExceeded(String),
}

impl CoreError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn precision(msg: impl Into<String>) -> Self {
        Self::PrecisionViolation(msg.into())
    }

    pub fn guard_limit(msg: impl Into<String>) -> Self {
        Self::GuardLimitExceeded(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
