//! Write Target Resolution Seam
//!
//! Invariants:
//! - Resolution is re-done before every write attempt, including the
//!   first; a host is never reused without re-resolution
//! - After any retryable failure the targeter may yield a different host

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::member::Host;
use crate::rpc::{ErrorKind, WriteError};

/// Resolves the replica set's authoritative destination to a concrete host.
pub trait Targeter: Send + Sync {
    /// Resolve a fresh target for the next attempt.
    ///
    /// Returns `Unreachable` when no candidate host is currently known.
    fn find_target(&self) -> Result<Host, WriteError>;
}

/// A targeter driven by an explicit script of hosts.
///
/// `set_find_host` replaces the current candidate; `push_host` queues
/// candidates that are handed out one per resolution, the last one
/// sticking. Counts resolutions so tests can assert that every attempt
/// re-resolved its target.
#[derive(Debug, Default)]
pub struct ScriptedTargeter {
    queue: Mutex<VecDeque<Host>>,
    resolutions: AtomicUsize,
}

impl ScriptedTargeter {
    /// Create an empty scripted targeter; resolution fails until a host is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a targeter that resolves to one fixed host.
    pub fn with_host(host: Host) -> Self {
        let targeter = Self::new();
        targeter.set_find_host(host);
        targeter
    }

    /// Replace the script with a single host returned on every resolution.
    pub fn set_find_host(&self, host: Host) {
        let mut queue = self.queue.lock().unwrap();
        queue.clear();
        queue.push_back(host);
    }

    /// Append a host to the script.
    pub fn push_host(&self, host: Host) {
        self.queue.lock().unwrap().push_back(host);
    }

    /// Drop all candidates; subsequent resolutions fail `Unreachable`.
    pub fn clear(&self) {
        self.queue.lock().unwrap().clear();
    }

    /// How many times a target has been resolved.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

impl Targeter for ScriptedTargeter {
    fn find_target(&self) -> Result<Host, WriteError> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.queue.lock().unwrap();
        let host = match queue.pop_front() {
            None => {
                return Err(WriteError::new(
                    ErrorKind::Unreachable,
                    "no target host available",
                ))
            }
            Some(host) => host,
        };
        if queue.is_empty() {
            // The last candidate sticks until replaced.
            queue.push_back(host.clone());
        }
        Ok(host)
    }
}
