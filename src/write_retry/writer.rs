//! Retrying Writer
//!
//! Executes one logical write against a replica set, retrying transient
//! failures against freshly resolved targets.
//!
//! Invariants:
//! - The caller observes success at most once per logical write, and
//!   only when the transport genuinely acknowledged it or reconciliation
//!   proved the document present with exactly the submitted content
//! - Retries for one logical write are strictly sequential; two
//!   concurrent in-flight copies would make duplicate-key
//!   disambiguation meaningless
//! - The target is re-resolved before every attempt, first included
//! - The retry loop is bounded by an attempt cap and a wall-clock
//!   deadline, checked before each retry; an in-flight call is never
//!   aborted

use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::cluster::{Host, Targeter};
use crate::observability::{Event, Logger};
use crate::rpc::{Deadline, ErrorKind, RpcRequest, RpcResponse, Transport, WriteError};

use super::config::RetryConfig;
use super::document::WriteRequest;
use super::reconciler::Reconciler;

/// Per-call retry bookkeeping. Created for one `write` call, mutated
/// across its attempts, discarded on completion.
#[derive(Debug, Default)]
struct WriteAttempt {
    targets: Vec<Host>,
    errors: Vec<WriteError>,
}

impl WriteAttempt {
    fn new() -> Self {
        Self::default()
    }

    fn note_target(&mut self, target: Host) {
        self.targets.push(target);
    }

    fn record_error(&mut self, error: WriteError) {
        self.errors.push(error);
    }

    /// Attempts started so far (targets are resolved once per attempt).
    fn attempts(&self) -> usize {
        self.targets.len()
    }

    /// Whether any earlier attempt failed with a retryable error.
    ///
    /// A duplicate key is ambiguous only in that case; on a first
    /// attempt it is an authoritative verdict.
    fn had_retryable_failure(&self) -> bool {
        self.errors.iter().any(|e| e.is_retryable())
    }
}

/// Executes logical writes with bounded, sequential retries.
///
/// Shareable across request-handling tasks; all per-write state lives in
/// the call frame.
pub struct RetryingWriter {
    targeter: Arc<dyn Targeter>,
    transport: Arc<dyn Transport>,
    reconciler: Reconciler,
    config: RetryConfig,
}

impl RetryingWriter {
    /// Create a writer over the given seams.
    pub fn new(
        targeter: Arc<dyn Targeter>,
        transport: Arc<dyn Transport>,
        config: RetryConfig,
    ) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&transport), config.transport_timeout);
        Self {
            targeter,
            transport,
            reconciler,
            config,
        }
    }

    /// Execute one logical write.
    ///
    /// Returns `Ok` on a genuine acknowledgment or a reconciled
    /// acknowledgment-lost duplicate; otherwise the terminal error. When
    /// the attempt cap or deadline is exhausted, the *last* error is
    /// returned.
    pub async fn write(&self, request: &WriteRequest, deadline: Deadline) -> Result<(), WriteError> {
        let op = Uuid::new_v4().to_string();
        let mut attempt = WriteAttempt::new();

        loop {
            let target = self.targeter.find_target()?;
            attempt.note_target(target.clone());

            let insert = RpcRequest::Insert {
                collection: request.collection.clone(),
                document: request.document.clone(),
            };
            let result = self
                .transport
                .send(&target, insert, self.config.transport_timeout)
                .await;

            match result {
                Ok(RpcResponse::WriteAck) => {
                    let attempts = attempt.attempts().to_string();
                    Logger::debug(
                        Event::WriteApplied,
                        &[
                            ("attempts", attempts.as_str()),
                            ("op", op.as_str()),
                            ("target", target.as_str()),
                        ],
                    );
                    return Ok(());
                }
                Ok(_) => {
                    let err = WriteError::new(
                        ErrorKind::InternalInconsistency,
                        "unexpected response to insert",
                    );
                    return Err(self.fail(&op, err));
                }
                Err(err) if err.kind() == ErrorKind::DuplicateKey => {
                    if !attempt.had_retryable_failure() {
                        // No earlier attempt could have landed this
                        // document; the duplicate verdict is final.
                        return Err(self.fail(&op, err));
                    }
                    let verdict = self.reconciler.resolve(request, &target, err).await;
                    return match verdict {
                        Ok(()) => {
                            Logger::info(
                                Event::WriteReconciled,
                                &[("op", op.as_str()), ("target", target.as_str())],
                            );
                            Ok(())
                        }
                        Err(err) => Err(self.fail(&op, err)),
                    };
                }
                Err(err) if err.is_retryable() => {
                    let attempts = attempt.attempts().to_string();
                    let error_s = err.to_string();
                    Logger::warn(
                        Event::WriteRetry,
                        &[
                            ("attempt", attempts.as_str()),
                            ("error", error_s.as_str()),
                            ("op", op.as_str()),
                            ("target", target.as_str()),
                        ],
                    );
                    attempt.record_error(err.clone());
                    if attempt.attempts() >= self.config.max_attempts {
                        return Err(self.fail(&op, err));
                    }
                    if deadline.expired() {
                        return Err(self.fail(&op, err));
                    }
                    self.backoff(attempt.attempts()).await;
                }
                Err(err) => {
                    // Validation/authorization-class failures: no retry.
                    return Err(self.fail(&op, err));
                }
            }
        }
    }

    fn fail(&self, op: &str, err: WriteError) -> WriteError {
        let error_s = err.to_string();
        Logger::error(
            Event::WriteFailed,
            &[("error", error_s.as_str()), ("op", op)],
        );
        err
    }

    /// Linear backoff with random jitter; disabled when base is zero.
    async fn backoff(&self, completed_attempts: usize) {
        let base = self.config.base_backoff;
        if base.is_zero() {
            return;
        }
        let scaled = base.saturating_mul(completed_attempts as u32);
        let jitter_cap = (scaled.as_millis() / 2) as u64;
        let jitter_ms = rand::thread_rng().gen_range(0..=jitter_cap);
        tokio::time::sleep(scaled + std::time::Duration::from_millis(jitter_ms)).await;
    }
}
