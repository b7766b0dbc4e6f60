//! Elector: Majority Visibility and Self-Election
//!
//! Invariants:
//! - A self-election is attempted only when a majority of voting members
//!   seems to be up
//! - Every election round burns a fresh, strictly higher term
//! - The local node may believe itself primary only after a quorum of
//!   ballot acknowledgments carrying the round's exact term
//! - An unreachable voter counts as a vote not granted, never as an
//!   error that aborts the round

use std::time::Duration;

use crate::cluster::{Host, Membership, NodeId};
use crate::observability::{Event, Logger};
use crate::rpc::{RpcRequest, RpcResponse, Transport};

use super::belief::Term;

/// True iff a majority of voting members (self included) looks alive.
///
/// The local node always counts itself as up; peers count when their
/// last heartbeat is younger than the liveness threshold.
pub fn majority_seems_up(membership: &Membership, liveness_threshold: Duration) -> bool {
    let up = membership
        .members()
        .iter()
        .filter(|peer| {
            peer.node_id == *membership.self_id() || peer.seems_up(liveness_threshold)
        })
        .count();
    up >= membership.majority_count()
}

/// Outcome of one self-election round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionOutcome {
    /// A quorum acknowledged the claim; the caller may become primary
    Won { term: Term },
    /// The round fell short; belief must not change
    Lost {
        term: Term,
        granted: usize,
        needed: usize,
    },
}

/// Gathers ballots for the local node's primary claim.
///
/// Owned by one election manager; rounds run strictly sequentially on
/// the health-check cadence, never concurrently.
#[derive(Debug)]
pub struct Elector {
    self_id: NodeId,
    term: Term,
}

impl Elector {
    /// Create an elector for the local node.
    pub fn new(self_id: NodeId) -> Self {
        Self {
            self_id,
            term: Term::initial(),
        }
    }

    /// The highest term this node has used.
    ///
    /// Retained across lost rounds and stepdowns so that a re-election
    /// always uses a strictly higher term.
    pub fn current_term(&self) -> Term {
        self.term
    }

    /// Run one election round: bump the term, ask every other voting
    /// member for a ballot, and win iff a quorum grants the exact term.
    pub async fn elect_self(
        &mut self,
        membership: &Membership,
        transport: &dyn Transport,
        ballot_timeout: Duration,
    ) -> ElectionOutcome {
        self.term = self.term.next();
        let term = self.term;
        let needed = membership.majority_count();

        let term_s = term.to_string();
        let needed_s = needed.to_string();
        Logger::info(
            Event::ElectionStarted,
            &[
                ("candidate", self.self_id.as_str()),
                ("needed", needed_s.as_str()),
                ("term", term_s.as_str()),
            ],
        );

        // Self votes for self.
        let mut granted = 1;
        for peer in membership.others() {
            let host = Host::from(&peer.node_id);
            let request = RpcRequest::RequestBallot {
                candidate: self.self_id.clone(),
                term,
            };
            match transport.send(&host, request, ballot_timeout).await {
                Ok(RpcResponse::Ballot(ballot)) if ballot.term == term && ballot.granted => {
                    granted += 1;
                }
                // Denied, stale-term, malformed, or unreachable: not granted.
                Ok(_) | Err(_) => {}
            }
        }

        if granted >= needed {
            ElectionOutcome::Won { term }
        } else {
            ElectionOutcome::Lost {
                term,
                granted,
                needed,
            }
        }
    }
}
