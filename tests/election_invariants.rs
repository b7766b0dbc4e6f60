//! Election Manager Invariant Tests
//!
//! - At most one accepted primary locally; remote disagreement is damped
//! - Two simultaneous remote primary claims never change belief and
//!   never panic
//! - Self-election runs only when a majority seems up, and only a
//!   quorum of term-matching ballots makes the local node primary
//! - A self-elected primary steps down when it loses majority
//!   visibility and a competing claim appears

use std::time::Duration;

use quorumdb::cluster::{Membership, NodeId, PeerRole, PeerState, StaticHealthView};
use quorumdb::election::{
    ElectionConfig, ElectionManager, ManagerSignal, PrimaryBelief, Term,
    CANT_SEE_MAJORITY_STATUS,
};
use quorumdb::rpc::{BallotResponse, ErrorKind, RpcRequest, RpcResponse, ScriptedTransport, WriteError};

fn node(id: &str) -> NodeId {
    NodeId::new(id)
}

fn peer(id: &str, role: PeerRole, age_ms: u64) -> PeerState {
    PeerState::new(node(id), role, Duration::from_millis(age_ms))
}

fn manager() -> ElectionManager {
    ElectionManager::new(node("a:27017"), ElectionConfig::default())
}

fn grant(voter: &str, term: Term) -> Result<RpcResponse, WriteError> {
    Ok(RpcResponse::Ballot(BallotResponse {
        voter: node(voter),
        term,
        granted: true,
    }))
}

/// Drive a three-member election the local node wins (term 1).
async fn become_primary(manager: &mut ElectionManager) {
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Secondary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let term = Term::initial().next();
    let transport = ScriptedTransport::new();
    transport.expect(move |_h, _r| grant("b:27017", term));
    transport.expect(move |_h, _r| grant("c:27017", term));

    manager.check_new_state(&membership, &transport).await;
    assert!(manager.current_primary().is_self());
}

// =============================================================================
// Remote Primary Adoption
// =============================================================================

/// Belief None, one peer reports primary: the claim is adopted and no
/// self-election is attempted.
#[tokio::test]
async fn test_adopts_single_remote_primary_from_none() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let transport = ScriptedTransport::new();

    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_remote(&node("b:27017")));
    // No ballot round was started.
    assert_eq!(manager.current_term(), Term::initial());
    assert_eq!(transport.remaining(), 0);
}

/// A belief naming one remote is replaced when a different remote claims.
#[tokio::test]
async fn test_adopts_new_remote_over_old_remote() {
    let mut manager = manager();
    let transport = ScriptedTransport::new();

    let first = Membership::new(
        node("a:27017"),
        vec![peer("b:27017", PeerRole::Primary, 50), peer("c:27017", PeerRole::Secondary, 50)],
    );
    manager.check_new_state(&first, &transport).await;
    assert!(manager.current_primary().is_remote(&node("b:27017")));

    let second = Membership::new(
        node("a:27017"),
        vec![peer("b:27017", PeerRole::Secondary, 50), peer("c:27017", PeerRole::Primary, 50)],
    );
    manager.check_new_state(&second, &transport).await;
    assert!(manager.current_primary().is_remote(&node("c:27017")));
}

// =============================================================================
// Split-Brain Damping
// =============================================================================

/// Two peers simultaneously reporting primary never changes belief.
#[tokio::test]
async fn test_two_remote_primaries_leave_belief_unchanged() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Primary, 50),
        ],
    );
    let transport = ScriptedTransport::new();

    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_none());
    assert_eq!(manager.current_term(), Term::initial());
}

/// The ambiguous observation is damped even while self is primary.
#[tokio::test]
async fn test_two_remote_primaries_do_not_dethrone_self() {
    let mut manager = manager();
    become_primary(&mut manager).await;

    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Primary, 50),
        ],
    );
    let transport = ScriptedTransport::new();
    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_self());
}

// =============================================================================
// Stepdown
// =============================================================================

/// Self primary, a competing claim, and no visible majority: step down
/// and adopt the competitor.
#[tokio::test]
async fn test_steps_down_when_majority_unreachable() {
    let mut manager = manager();
    become_primary(&mut manager).await;

    // Five members; only self and the claimant are fresh.
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Down, 120_000),
            peer("d:27017", PeerRole::Down, 120_000),
            peer("e:27017", PeerRole::Down, 120_000),
        ],
    );
    let transport = ScriptedTransport::new();
    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_remote(&node("b:27017")));
}

/// Same competing claim with a visible majority: the claim is treated
/// as stale and self remains primary.
#[tokio::test]
async fn test_ignores_competing_claim_with_visible_majority() {
    let mut manager = manager();
    become_primary(&mut manager).await;

    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let transport = ScriptedTransport::new();
    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_self());
}

/// A re-election after stepdown uses a strictly higher term.
#[tokio::test]
async fn test_reelection_after_stepdown_burns_higher_term() {
    let mut manager = manager();
    become_primary(&mut manager).await;
    assert_eq!(manager.current_term(), Term::initial().next());

    // Step down.
    let partitioned = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Down, 120_000),
            peer("d:27017", PeerRole::Down, 120_000),
            peer("e:27017", PeerRole::Down, 120_000),
        ],
    );
    let transport = ScriptedTransport::new();
    manager.check_new_state(&partitioned, &transport).await;
    assert!(!manager.current_primary().is_self());

    // Partition heals, the old primary is gone, and we win again.
    let healed = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Secondary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let term2 = Term::initial().next().next();
    let transport = ScriptedTransport::new();
    transport.expect(move |_h, _r| grant("b:27017", term2));
    transport.expect(move |_h, _r| grant("c:27017", term2));
    manager.check_new_state(&healed, &transport).await;

    assert_eq!(manager.current_primary(), &PrimaryBelief::SelfPrimary { term: term2 });
}

// =============================================================================
// Self-Election Gating
// =============================================================================

/// No primary anywhere and a majority visible: the node elects itself
/// after a quorum of term-matching ballots.
#[tokio::test]
async fn test_elects_self_with_quorum() {
    let mut manager = manager();
    become_primary(&mut manager).await;
    assert_eq!(
        manager.current_primary(),
        &PrimaryBelief::SelfPrimary { term: Term::initial().next() }
    );
    assert_eq!(manager.status_message(), "primary (term 1)");
}

/// Without a majority the node publishes the diagnostic and does not
/// start a ballot round.
#[tokio::test]
async fn test_majority_gate_blocks_self_election() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Down, 120_000),
            peer("c:27017", PeerRole::Down, 120_000),
        ],
    );
    let transport = ScriptedTransport::new();

    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_none());
    assert_eq!(manager.status_message(), CANT_SEE_MAJORITY_STATUS);
    assert_eq!(manager.current_term(), Term::initial());
}

/// A lost round leaves belief unchanged and burns its term.
#[tokio::test]
async fn test_lost_election_keeps_belief() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Secondary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let transport = ScriptedTransport::new();
    transport.expect(|_h, _r| Err(WriteError::new(ErrorKind::NetworkTimeout, "voter down")));
    transport.expect(|_h, _r| Err(WriteError::new(ErrorKind::NetworkTimeout, "voter down")));

    manager.check_new_state(&membership, &transport).await;

    assert!(manager.current_primary().is_none());
    assert_eq!(manager.current_term(), Term::initial().next());
}

// =============================================================================
// Idempotence
// =============================================================================

/// An unchanged snapshot passed twice produces no additional change.
#[tokio::test]
async fn test_check_new_state_is_idempotent() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Primary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let transport = ScriptedTransport::new();

    manager.check_new_state(&membership, &transport).await;
    let belief_after_first = manager.current_primary().clone();
    let status_after_first = manager.status_message().to_string();
    let term_after_first = manager.current_term();

    manager.check_new_state(&membership, &transport).await;

    assert_eq!(manager.current_primary(), &belief_after_first);
    assert_eq!(manager.status_message(), status_after_first);
    assert_eq!(manager.current_term(), term_after_first);
}

/// Once primary, an unchanged quiet snapshot stays a no-op: no new
/// ballot round, same term.
#[tokio::test]
async fn test_primary_snapshot_replay_is_noop() {
    let mut manager = manager();
    become_primary(&mut manager).await;
    let term = manager.current_term();

    let quiet = Membership::new(
        node("a:27017"),
        vec![
            peer("b:27017", PeerRole::Secondary, 50),
            peer("c:27017", PeerRole::Secondary, 50),
        ],
    );
    let transport = ScriptedTransport::new();
    manager.check_new_state(&quiet, &transport).await;
    manager.check_new_state(&quiet, &transport).await;

    assert!(manager.current_primary().is_self());
    assert_eq!(manager.current_term(), term);
}

// =============================================================================
// Signal Dispatch and Health View
// =============================================================================

/// The health-check signal runs the same state machine as a direct call.
#[tokio::test]
async fn test_check_new_state_signal_dispatch() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![peer("b:27017", PeerRole::Primary, 50)],
    );
    let transport = ScriptedTransport::new();

    manager
        .handle(ManagerSignal::CheckNewState(membership), &transport)
        .await;

    assert!(manager.current_primary().is_remote(&node("b:27017")));
}

/// Polling a health view consumes its snapshot.
#[tokio::test]
async fn test_poll_consumes_health_view_snapshot() {
    let mut manager = manager();
    let health = StaticHealthView::new(Membership::new(
        node("a:27017"),
        vec![peer("b:27017", PeerRole::Primary, 50)],
    ));
    let transport = ScriptedTransport::new();

    manager.poll(&health, &transport).await;

    assert!(manager.current_primary().is_remote(&node("b:27017")));
}

/// A ballot request carries the candidate identity and fresh term.
#[tokio::test]
async fn test_ballot_request_shape() {
    let mut manager = manager();
    let membership = Membership::new(
        node("a:27017"),
        vec![peer("b:27017", PeerRole::Secondary, 50)],
    );
    let transport = ScriptedTransport::new();
    transport.expect(|_h, request| match request {
        RpcRequest::RequestBallot { candidate, term } => {
            assert_eq!(candidate, &NodeId::new("a:27017"));
            assert_eq!(*term, Term::initial().next());
            Ok(RpcResponse::Ballot(BallotResponse {
                voter: NodeId::new("b:27017"),
                term: *term,
                granted: true,
            }))
        }
        other => panic!("unexpected request {:?}", other),
    });

    manager.check_new_state(&membership, &transport).await;
    assert!(manager.current_primary().is_self());
}
