//! Wall-Clock Deadlines for Write Calls

use std::time::{Duration, Instant};

/// A point in time after which no further retry may start.
///
/// Deadlines bound the retry loop, not individual calls: an in-flight
/// request runs to completion or to its own transport timeout and is
/// never aborted mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline this far in the future.
    pub fn after(duration: Duration) -> Self {
        Self(Instant::now() + duration)
    }

    /// A deadline at an explicit instant.
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Time remaining, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}
