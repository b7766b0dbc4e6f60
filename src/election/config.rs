//! Election Configuration
//!
//! Configured externally, validated on construction, replaceable at
//! runtime through a typed config-update signal.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{ElectionError, ElectionResult};

/// Default heartbeat-age threshold below which a member counts as up.
pub const DEFAULT_LIVENESS_THRESHOLD: Duration = Duration::from_secs(10);

/// Default per-voter timeout for a ballot request.
pub const DEFAULT_BALLOT_TIMEOUT: Duration = Duration::from_secs(2);

/// Tunables for the election manager and elector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Heartbeat-age threshold below which a member counts as up
    pub liveness_threshold: Duration,
    /// Per-voter timeout for one ballot request
    pub ballot_timeout: Duration,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            liveness_threshold: DEFAULT_LIVENESS_THRESHOLD,
            ballot_timeout: DEFAULT_BALLOT_TIMEOUT,
        }
    }
}

impl ElectionConfig {
    /// Build a validated configuration.
    pub fn new(liveness_threshold: Duration, ballot_timeout: Duration) -> ElectionResult<Self> {
        let config = Self {
            liveness_threshold,
            ballot_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants: both durations must be non-zero.
    pub fn validate(&self) -> ElectionResult<()> {
        if self.liveness_threshold.is_zero() {
            return Err(ElectionError::InvalidConfig(
                "liveness_threshold must be non-zero".to_string(),
            ));
        }
        if self.ballot_timeout.is_zero() {
            return Err(ElectionError::InvalidConfig(
                "ballot_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
