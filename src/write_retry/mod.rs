//! Idempotent Write Retry Subsystem
//!
//! Effectively-once write semantics over an at-most-once network,
//! without dedup tokens or transactions:
//!
//! - Transient failures are retried against freshly resolved targets,
//!   bounded by an attempt cap and a wall-clock deadline
//! - A duplicate key after a retried attempt is ambiguous and resolved
//!   by a content-comparing point read
//! - Unresolvable ambiguity surfaces as failure, never as success

mod config;
mod document;
mod reconciler;
mod writer;

pub use config::{RetryConfig, RetryConfigError, DEFAULT_MAX_ATTEMPTS, DEFAULT_TRANSPORT_TIMEOUT};
pub use document::{WriteDocument, WriteRequest};
pub use reconciler::{ReconciliationQuery, Reconciler};
pub use writer::RetryingWriter;
