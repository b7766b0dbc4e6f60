//! Election Belief
//!
//! Invariants:
//! - The belief is a local, possibly stale view: at most one primary at
//!   a time locally, while different nodes may transiently disagree
//! - Exclusively owned by one election manager; never shared or written
//!   concurrently
//! - A self-primary claim always carries the term it was won under

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cluster::NodeId;

/// A monotonically increasing election term.
///
/// Attached to every primary claim and every ballot; a quorum of
/// acknowledgments for the same term is required before the local node
/// may believe itself primary. Terms are never reused, including by
/// failed election rounds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Term(u64);

impl Term {
    /// The term before any election has run.
    pub fn initial() -> Self {
        Self(0)
    }

    /// The next term, strictly greater than this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who the local node currently believes is primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryBelief {
    /// No member is believed to be primary
    NoPrimary,
    /// The local node believes itself primary, under the given term
    SelfPrimary { term: Term },
    /// A remote member is believed to be primary
    RemotePrimary { node_id: NodeId },
}

impl PrimaryBelief {
    /// Whether the local node believes itself primary.
    pub fn is_self(&self) -> bool {
        matches!(self, Self::SelfPrimary { .. })
    }

    /// Whether no primary is believed to exist.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::NoPrimary)
    }

    /// Whether this exact remote member is believed primary.
    pub fn is_remote(&self, node_id: &NodeId) -> bool {
        matches!(self, Self::RemotePrimary { node_id: id } if id == node_id)
    }

    /// Belief description for observability.
    pub fn describe(&self) -> String {
        match self {
            Self::NoPrimary => "none".to_string(),
            Self::SelfPrimary { term } => format!("self (term {})", term),
            Self::RemotePrimary { node_id } => node_id.to_string(),
        }
    }
}

/// The election manager's owned state: current belief plus a read-only
/// diagnostic string updated on every decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionBelief {
    primary: PrimaryBelief,
    status_message: String,
}

impl Default for ElectionBelief {
    fn default() -> Self {
        Self::new()
    }
}

impl ElectionBelief {
    /// Start with no primary and an empty status.
    pub fn new() -> Self {
        Self {
            primary: PrimaryBelief::NoPrimary,
            status_message: String::new(),
        }
    }

    /// Current belief.
    pub fn primary(&self) -> &PrimaryBelief {
        &self.primary
    }

    /// Diagnostic message, empty when there is nothing to report.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Adopt a remote member's primary claim.
    pub fn adopt_remote(&mut self, node_id: NodeId) {
        self.status_message = format!("following primary {}", node_id);
        self.primary = PrimaryBelief::RemotePrimary { node_id };
    }

    /// Become primary after winning an election under `term`.
    pub fn become_self(&mut self, term: Term) {
        self.status_message = format!("primary (term {})", term);
        self.primary = PrimaryBelief::SelfPrimary { term };
    }

    /// Set the diagnostic message without touching the belief.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Clear the diagnostic message.
    pub fn clear_status(&mut self) {
        self.status_message.clear();
    }
}
