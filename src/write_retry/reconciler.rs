//! Duplicate-Key Reconciliation
//!
//! When a retried write fails with a duplicate key, the failure is
//! ambiguous: either an earlier attempt applied and its acknowledgment
//! was lost, or an unrelated write owns the key. A point read by the
//! document's unique key, content-compared against the submitted
//! document, resolves which.
//!
//! Invariants:
//! - Success is returned only when the found document is byte-identical
//!   to the submitted one
//! - Ambiguity that cannot be resolved surfaces as failure, never as
//!   success

use std::sync::Arc;
use std::time::Duration;

use crate::cluster::Host;
use crate::rpc::{ErrorKind, RpcRequest, RpcResponse, Transport, WriteError};

use super::document::{WriteDocument, WriteRequest};

/// The point read built for one ambiguous failure. Ephemeral; exists
/// only for the duration of the reconciliation.
#[derive(Debug, Clone)]
pub struct ReconciliationQuery {
    /// Unique-key predicate derived from the document's identity field
    pub key: serde_json::Value,
    /// The document the disputed write submitted
    pub expected: WriteDocument,
}

impl ReconciliationQuery {
    /// Derive the query for a disputed write.
    pub fn for_request(request: &WriteRequest) -> Self {
        Self {
            key: request.document.key().clone(),
            expected: request.document.clone(),
        }
    }
}

/// Resolves ambiguous duplicate-key failures by content-comparing a
/// point read against the same target that reported the duplicate.
pub struct Reconciler {
    transport: Arc<dyn Transport>,
    read_timeout: Duration,
}

impl Reconciler {
    /// Create a reconciler over the given transport.
    pub fn new(transport: Arc<dyn Transport>, read_timeout: Duration) -> Self {
        Self {
            transport,
            read_timeout,
        }
    }

    /// Determine the true outcome of a disputed write.
    ///
    /// - read fails: the read failure is surfaced (still unresolved)
    /// - no document under the key: the disputed write did not durably
    ///   land; the original duplicate-key error is surfaced
    /// - found with matching content: the earlier, acknowledgment-lost
    ///   attempt applied; the write succeeded
    /// - found with differing content: a different write owns the key;
    ///   the original duplicate-key error is surfaced
    pub async fn resolve(
        &self,
        request: &WriteRequest,
        target: &Host,
        original: WriteError,
    ) -> Result<(), WriteError> {
        let query = ReconciliationQuery::for_request(request);
        let read = RpcRequest::FindByKey {
            collection: request.collection.clone(),
            key: query.key.clone(),
        };

        match self.transport.send(target, read, self.read_timeout).await {
            Err(read_err) => Err(read_err),
            Ok(RpcResponse::Documents(documents)) => match documents.first() {
                None => Err(original),
                Some(found) if found.content_matches(&query.expected) => Ok(()),
                Some(_) => Err(original),
            },
            Ok(_) => Err(WriteError::new(
                ErrorKind::InternalInconsistency,
                "unexpected response to reconciliation read",
            )),
        }
    }
}
