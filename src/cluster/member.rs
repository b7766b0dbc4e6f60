//! Node Identity and Membership Snapshots
//!
//! Invariants:
//! - A membership snapshot is ordered, deduplicated, and immutable
//! - The local node is present exactly once in every snapshot
//! - Snapshots are read-mostly: readers clone, nobody holds a lock
//!   across a network call

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical identity of a voting member ("host:port" by convention).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete, routable host resolved by the targeter.
///
/// Distinct from `NodeId`: the targeter may resolve the same logical
/// destination to different hosts across retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    /// Create a new host address.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&NodeId> for Host {
    /// Voting members are addressed directly by their identity.
    fn from(node_id: &NodeId) -> Self {
        Self(node_id.as_str().to_string())
    }
}

/// Last-known role of a peer, as reported by health polling.
///
/// This is an observation, not a fact: polling is asynchronous and the
/// reported role may be stale by the time it is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerRole {
    /// No successful poll yet
    Unknown,
    /// Peer reports itself as a secondary
    Secondary,
    /// Peer reports itself as the primary
    Primary,
    /// Peer is unreachable
    Down,
}

impl PeerRole {
    /// Role name for observability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Secondary => "secondary",
            Self::Primary => "primary",
            Self::Down => "down",
        }
    }
}

/// One voting member's last-known state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerState {
    /// Member identity
    pub node_id: NodeId,
    /// Role the member reported on its last poll
    pub reported_role: PeerRole,
    /// Time since the last successful heartbeat
    pub last_heartbeat_age: Duration,
}

impl PeerState {
    /// Create a new peer state.
    pub fn new(node_id: NodeId, reported_role: PeerRole, last_heartbeat_age: Duration) -> Self {
        Self {
            node_id,
            reported_role,
            last_heartbeat_age,
        }
    }

    /// Whether the heartbeat is fresh enough to count the member as up.
    pub fn seems_up(&self, liveness_threshold: Duration) -> bool {
        self.last_heartbeat_age < liveness_threshold
    }
}

/// An immutable snapshot of all voting members, self included.
///
/// Construction deduplicates by node id (first occurrence wins) and
/// guarantees the local node is present exactly once: if the caller's
/// list omits it, a self entry with role `Unknown` and zero heartbeat
/// age is inserted at the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    self_id: NodeId,
    members: Vec<PeerState>,
    observed_at: DateTime<Utc>,
}

impl Membership {
    /// Build a snapshot from the local identity and polled peer states.
    pub fn new(self_id: NodeId, peers: Vec<PeerState>) -> Self {
        let mut members: Vec<PeerState> = Vec::with_capacity(peers.len() + 1);
        for peer in peers {
            if members.iter().any(|m| m.node_id == peer.node_id) {
                continue;
            }
            members.push(peer);
        }
        if !members.iter().any(|m| m.node_id == self_id) {
            // The local node is always live to itself.
            members.insert(
                0,
                PeerState::new(self_id.clone(), PeerRole::Unknown, Duration::ZERO),
            );
        }
        Self {
            self_id,
            members,
            observed_at: Utc::now(),
        }
    }

    /// The local node's identity.
    pub fn self_id(&self) -> &NodeId {
        &self.self_id
    }

    /// All voting members, self included.
    pub fn members(&self) -> &[PeerState] {
        &self.members
    }

    /// All voting members except self.
    pub fn others(&self) -> impl Iterator<Item = &PeerState> {
        self.members.iter().filter(move |m| m.node_id != self.self_id)
    }

    /// Look up one member by identity.
    pub fn get(&self, node_id: &NodeId) -> Option<&PeerState> {
        self.members.iter().find(|m| &m.node_id == node_id)
    }

    /// Number of voting members, self included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the snapshot holds only the local node.
    pub fn is_empty(&self) -> bool {
        self.members.len() <= 1
    }

    /// Votes required for a majority: floor(N/2) + 1.
    pub fn majority_count(&self) -> usize {
        self.members.len() / 2 + 1
    }

    /// When this snapshot was taken.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}
