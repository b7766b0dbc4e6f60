//! Cluster Identity, Health, and Targeting
//!
//! - Node identity and immutable membership snapshots
//! - The health-view seam feeding the election manager
//! - The targeter seam resolving write destinations
//!
//! Everything here is data and seams; no networking happens in this
//! module.

mod health;
mod member;
mod targeter;

pub use health::{PeerHealthView, StaticHealthView};
pub use member::{Host, Membership, NodeId, PeerRole, PeerState};
pub use targeter::{ScriptedTargeter, Targeter};
