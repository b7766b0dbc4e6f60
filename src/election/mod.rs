//! Leader Election Subsystem
//!
//! Decides, from asynchronously gossiped peer state, whether the local
//! node should become or remain the write primary.
//!
//! - At most one locally accepted primary at a time; transient
//!   disagreement between nodes is tolerated and self-corrects
//! - Apparent split-brain (two remote claims in one snapshot) is damped,
//!   never escalated
//! - Self-election requires majority visibility and quorum
//!   acknowledgment of a monotonically increasing term

mod belief;
mod config;
mod elector;
mod errors;
mod manager;

pub use belief::{ElectionBelief, PrimaryBelief, Term};
pub use config::{ElectionConfig, DEFAULT_BALLOT_TIMEOUT, DEFAULT_LIVENESS_THRESHOLD};
pub use elector::{majority_seems_up, ElectionOutcome, Elector};
pub use errors::{ElectionError, ElectionResult};
pub use manager::{
    scan_other_primaries, ElectionManager, ManagerSignal, PeerScanOutcome,
    CANT_SEE_MAJORITY_STATUS,
};
