//! Write Retry Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum attempts for one logical write.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default per-call transport timeout.
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryConfigError {
    /// A configuration value failed validation
    #[error("invalid retry configuration: {0}")]
    Invalid(String),
}

/// Tunables for the retrying writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts for one logical write, first attempt included
    pub max_attempts: usize,
    /// Base delay before a retry, scaled linearly by attempt count with
    /// random jitter on top; zero disables backoff entirely
    pub base_backoff: Duration,
    /// Timeout handed to the transport for each individual call
    pub transport_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::ZERO,
            transport_timeout: DEFAULT_TRANSPORT_TIMEOUT,
        }
    }
}

impl RetryConfig {
    /// Build a validated configuration.
    pub fn new(
        max_attempts: usize,
        base_backoff: Duration,
        transport_timeout: Duration,
    ) -> Result<Self, RetryConfigError> {
        let config = Self {
            max_attempts,
            base_backoff,
            transport_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants: at least one attempt, non-zero call timeout.
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if self.max_attempts == 0 {
            return Err(RetryConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.transport_timeout.is_zero() {
            return Err(RetryConfigError::Invalid(
                "transport_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
