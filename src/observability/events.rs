//! Observable Events
//!
//! Every belief-changing election decision and every write retry emits
//! exactly one typed event. Events are explicit; free-form log strings
//! are not part of the vocabulary.

use std::fmt;

/// Observable events in the election and write-retry core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Election
    /// A remote member's primary claim was adopted
    PrimaryAdopted,
    /// The local node stepped down in favor of a remote primary
    PrimaryStepDown,
    /// More than one other member claimed primary in one snapshot
    MultiPrimaryObserved,
    /// A self-election round started
    ElectionStarted,
    /// A self-election round gathered a quorum
    ElectionWon,
    /// A self-election round fell short of a quorum
    ElectionLost,
    /// A majority of voting members is not visible
    MajorityLost,

    // Configuration
    /// A config update was applied
    ConfigUpdated,
    /// A config update failed to parse or validate
    ConfigRejected,

    // Write path
    /// A write was applied and acknowledged
    WriteApplied,
    /// A write attempt failed with a retryable error
    WriteRetry,
    /// An ambiguous duplicate was proven to be our own earlier write
    WriteReconciled,
    /// A write failed terminally
    WriteFailed,
}

impl Event {
    /// Event name for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryAdopted => "PRIMARY_ADOPTED",
            Self::PrimaryStepDown => "PRIMARY_STEP_DOWN",
            Self::MultiPrimaryObserved => "MULTI_PRIMARY_OBSERVED",
            Self::ElectionStarted => "ELECTION_STARTED",
            Self::ElectionWon => "ELECTION_WON",
            Self::ElectionLost => "ELECTION_LOST",
            Self::MajorityLost => "MAJORITY_LOST",
            Self::ConfigUpdated => "CONFIG_UPDATED",
            Self::ConfigRejected => "CONFIG_REJECTED",
            Self::WriteApplied => "WRITE_APPLIED",
            Self::WriteRetry => "WRITE_RETRY",
            Self::WriteReconciled => "WRITE_RECONCILED",
            Self::WriteFailed => "WRITE_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::PrimaryAdopted,
            Event::MultiPrimaryObserved,
            Event::WriteReconciled,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
