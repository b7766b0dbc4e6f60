//! Election Manager
//!
//! Consumes membership snapshots from health polling and decides whether
//! the local node should adopt a remote primary, step down, or attempt
//! self-election.
//!
//! Invariants:
//! - Two simultaneous remote primary claims are a transient artifact of
//!   asynchronous polling: logged, belief unchanged, resolved by a later
//!   poll. Never fatal, never an error across a component boundary.
//! - A node that believes itself primary steps down when it cannot see a
//!   majority and a competing primary claim is observed.
//! - Self-election is gated on majority visibility and requires quorum
//!   acknowledgment of a fresh term before the belief changes.
//! - `check_new_state` runs on a single-threaded cadence; invocations
//!   for one replica set are serialized and never overlap.

use serde_json::Value;

use crate::cluster::{Membership, NodeId, PeerHealthView, PeerRole};
use crate::observability::{Event, Logger};
use crate::rpc::Transport;

use super::belief::{ElectionBelief, PrimaryBelief, Term};
use super::config::ElectionConfig;
use super::elector::{majority_seems_up, ElectionOutcome, Elector};

/// Status message published while majority visibility blocks self-election.
pub const CANT_SEE_MAJORITY_STATUS: &str = "can't see a majority, won't elect self";

/// What the scan over other members' primary claims found.
///
/// A typed outcome: ambiguity is data, not an exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerScanOutcome {
    /// No other member claims to be primary
    NoneClaimed,
    /// Exactly one other member claims to be primary
    Single(NodeId),
    /// More than one other member claims to be primary
    Ambiguous { claimants: Vec<NodeId> },
}

/// Scan members other than self for primary claims.
pub fn scan_other_primaries(membership: &Membership) -> PeerScanOutcome {
    let mut claimants: Vec<NodeId> = membership
        .others()
        .filter(|peer| peer.reported_role == PeerRole::Primary)
        .map(|peer| peer.node_id.clone())
        .collect();
    match claimants.len() {
        0 => PeerScanOutcome::NoneClaimed,
        1 => PeerScanOutcome::Single(claimants.remove(0)),
        _ => PeerScanOutcome::Ambiguous { claimants },
    }
}

/// Messages the manager consumes, dispatched by exhaustive match.
#[derive(Debug, Clone)]
pub enum ManagerSignal {
    /// A fresh membership snapshot from health polling
    CheckNewState(Membership),
    /// A replica-set config document pushed from outside
    ConfigUpdate(Value),
}

/// Per-replica-set election state machine.
///
/// Owns its belief exclusively; one instance per replica set, no
/// process-wide state.
#[derive(Debug)]
pub struct ElectionManager {
    self_id: NodeId,
    belief: ElectionBelief,
    elector: Elector,
    config: ElectionConfig,
}

impl ElectionManager {
    /// Create a manager for the local node.
    pub fn new(self_id: NodeId, config: ElectionConfig) -> Self {
        Self {
            elector: Elector::new(self_id.clone()),
            self_id,
            belief: ElectionBelief::new(),
            config,
        }
    }

    /// The local node's identity.
    pub fn self_id(&self) -> &NodeId {
        &self.self_id
    }

    /// Current belief about the primary.
    pub fn current_primary(&self) -> &PrimaryBelief {
        self.belief.primary()
    }

    /// Read-only diagnostic string, updated on every decision.
    pub fn status_message(&self) -> &str {
        self.belief.status_message()
    }

    /// The highest election term this node has used.
    pub fn current_term(&self) -> Term {
        self.elector.current_term()
    }

    /// The active configuration.
    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    /// Pull a snapshot from the health view and run one state check.
    pub async fn poll(&mut self, health: &dyn PeerHealthView, transport: &dyn Transport) {
        let membership = health.membership();
        self.check_new_state(&membership, transport).await;
    }

    /// Consume one signal.
    pub async fn handle(&mut self, signal: ManagerSignal, transport: &dyn Transport) {
        match signal {
            ManagerSignal::CheckNewState(membership) => {
                self.check_new_state(&membership, transport).await;
            }
            ManagerSignal::ConfigUpdate(document) => self.apply_config_update(document),
        }
    }

    /// Run the primary-agreement algorithm against one snapshot.
    ///
    /// Idempotent for an unchanged snapshot: feeding the same membership
    /// twice produces no additional state change.
    pub async fn check_new_state(&mut self, membership: &Membership, transport: &dyn Transport) {
        match scan_other_primaries(membership) {
            PeerScanOutcome::Ambiguous { claimants } => {
                // Polling is asynchronous; two remote claims usually mean
                // one of them is stale. Wait for things to settle down.
                let names: Vec<&str> = claimants.iter().map(|n| n.as_str()).collect();
                let joined = names.join(",");
                Logger::warn(
                    Event::MultiPrimaryObserved,
                    &[("claimants", joined.as_str())],
                );
            }
            PeerScanOutcome::Single(claimant) => {
                self.note_remote_primary(claimant, membership);
            }
            PeerScanOutcome::NoneClaimed => {
                self.consider_self_election(membership, transport).await;
            }
        }
    }

    /// Exactly one other member claims primary; reconcile with belief.
    fn note_remote_primary(&mut self, claimant: NodeId, membership: &Membership) {
        let primary = self.belief.primary().clone();
        match primary {
            PrimaryBelief::RemotePrimary { ref node_id } if *node_id == claimant => {
                // Already agree.
            }
            PrimaryBelief::NoPrimary | PrimaryBelief::RemotePrimary { .. } => {
                Logger::info(Event::PrimaryAdopted, &[("node", claimant.as_str())]);
                self.belief.adopt_remote(claimant);
            }
            PrimaryBelief::SelfPrimary { term } => {
                if majority_seems_up(membership, self.config.liveness_threshold) {
                    // We can see a majority; the competing claim is
                    // treated as stale gossip and ignored.
                    return;
                }
                // A primary that cannot see a majority must not remain
                // authoritative once a competitor appears.
                let term_s = term.to_string();
                Logger::warn(
                    Event::PrimaryStepDown,
                    &[
                        ("new_primary", claimant.as_str()),
                        ("relinquished_term", term_s.as_str()),
                    ],
                );
                self.belief.adopt_remote(claimant);
            }
        }
    }

    /// No member claims primary; decide whether to elect self.
    async fn consider_self_election(&mut self, membership: &Membership, transport: &dyn Transport) {
        if self.belief.primary().is_self() {
            // Already primary and nothing significant out there changed.
            return;
        }

        if !majority_seems_up(membership, self.config.liveness_threshold) {
            self.belief.set_status(CANT_SEE_MAJORITY_STATUS);
            let visible = membership.len().to_string();
            Logger::info(Event::MajorityLost, &[("members", visible.as_str())]);
            return;
        }

        self.belief.clear_status();
        let outcome = self
            .elector
            .elect_self(membership, transport, self.config.ballot_timeout)
            .await;
        match outcome {
            ElectionOutcome::Won { term } => {
                let term_s = term.to_string();
                Logger::info(Event::ElectionWon, &[("term", term_s.as_str())]);
                self.belief.become_self(term);
            }
            ElectionOutcome::Lost {
                term,
                granted,
                needed,
            } => {
                let term_s = term.to_string();
                let granted_s = granted.to_string();
                let needed_s = needed.to_string();
                Logger::info(
                    Event::ElectionLost,
                    &[
                        ("granted", granted_s.as_str()),
                        ("needed", needed_s.as_str()),
                        ("term", term_s.as_str()),
                    ],
                );
            }
        }
    }

    /// Apply a pushed config document, ignoring it when invalid.
    fn apply_config_update(&mut self, document: Value) {
        match serde_json::from_value::<ElectionConfig>(document) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    Logger::info(Event::ConfigUpdated, &[]);
                    self.config = config;
                }
                Err(err) => {
                    let reason = err.to_string();
                    Logger::warn(Event::ConfigRejected, &[("reason", reason.as_str())]);
                }
            },
            Err(err) => {
                let reason = err.to_string();
                Logger::warn(Event::ConfigRejected, &[("reason", reason.as_str())]);
            }
        }
    }
}
