//! Observability
//!
//! Typed events and a synchronous structured-JSON logger. The election
//! manager additionally exposes a read-only status message for external
//! monitoring; neither is part of the correctness contract.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Level, Logger};
