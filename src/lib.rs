//! quorumdb - replica-set leader election and idempotent write-retry core
//!
//! Two correctness-critical subsystems of a distributed document store:
//!
//! - `election`: decides from gossiped peer health whether the local node
//!   should become, remain, or stop being the write primary, damping
//!   transient split-brain observations instead of escalating them.
//! - `write_retry`: executes one logical write against a replica set over
//!   an unreliable network, retrying transient failures against freshly
//!   resolved targets and disambiguating "write lost" from "write applied,
//!   acknowledgment lost" via a content-comparing reconciliation read.
//!
//! Storage, query matching, wire encoding, and transport plumbing are
//! external collaborators, consumed only through the seams in `cluster`
//! and `rpc`.

pub mod cluster;
pub mod election;
pub mod observability;
pub mod rpc;
pub mod write_retry;
