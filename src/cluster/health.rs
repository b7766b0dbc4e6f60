//! Peer Health View Seam
//!
//! Liveness is inferred from best-effort periodic polling, not proven.
//! The election manager consumes whatever snapshot the health view hands
//! it and never polls on its own.

use super::member::Membership;

/// Source of membership snapshots.
///
/// Implementations poll all voting members on their own cadence and
/// publish each member's last-known role and heartbeat recency. The
/// snapshot handed out is a value: the caller may hold it as long as it
/// likes without blocking the poller.
pub trait PeerHealthView: Send + Sync {
    /// The current membership snapshot.
    fn membership(&self) -> Membership;
}

/// A health view that always returns one fixed snapshot.
///
/// Used where the snapshot is assembled externally, and as a scripted
/// collaborator in tests.
#[derive(Debug, Clone)]
pub struct StaticHealthView {
    membership: Membership,
}

impl StaticHealthView {
    /// Wrap a pre-built snapshot.
    pub fn new(membership: Membership) -> Self {
        Self { membership }
    }
}

impl PeerHealthView for StaticHealthView {
    fn membership(&self) -> Membership {
        self.membership.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::member::{NodeId, PeerRole, PeerState};
    use std::time::Duration;

    #[test]
    fn test_static_view_returns_snapshot() {
        let membership = Membership::new(
            NodeId::new("a:27017"),
            vec![PeerState::new(
                NodeId::new("b:27017"),
                PeerRole::Secondary,
                Duration::from_millis(20),
            )],
        );
        let view = StaticHealthView::new(membership.clone());
        assert_eq!(view.membership(), membership);
    }
}
