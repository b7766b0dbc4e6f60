//! Election Error Types

use thiserror::Error;

/// Election module result type.
pub type ElectionResult<T> = Result<T, ElectionError>;

/// Errors surfaced by the election subsystem.
///
/// Deliberately small: multi-primary observations and lost elections are
/// expected conditions reported as typed outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    /// A configuration value failed validation
    #[error("invalid election configuration: {0}")]
    InvalidConfig(String),

    /// A config update payload did not parse
    #[error("malformed config update: {0}")]
    MalformedConfigUpdate(String),
}
