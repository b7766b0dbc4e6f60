//! Typed RPC Vocabulary
//!
//! Every remote outcome is a typed value; nothing is thrown or inspected
//! by runtime type. The error kinds here are the full status vocabulary
//! surfaced to callers of the write path.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::NodeId;
use crate::election::Term;
use crate::write_retry::WriteDocument;

/// Failure classification for remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The call did not complete within its transport timeout
    NetworkTimeout,
    /// The remote aborted the operation mid-flight
    Interrupted,
    /// The remote is not currently the write primary
    NotPrimary,
    /// A document with the same unique key already exists
    DuplicateKey,
    /// No target could be resolved or reached
    Unreachable,
    /// A response arrived that the protocol does not allow here
    InternalInconsistency,
}

impl ErrorKind {
    /// Whether a fresh attempt against a re-resolved target may succeed.
    ///
    /// `DuplicateKey` is deliberately not retryable: it is ambiguous and
    /// goes through reconciliation instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkTimeout | Self::Interrupted | Self::NotPrimary
        )
    }

    /// Kind name for observability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "network_timeout",
            Self::Interrupted => "interrupted",
            Self::NotPrimary => "not_primary",
            Self::DuplicateKey => "duplicate_key",
            Self::Unreachable => "unreachable",
            Self::InternalInconsistency => "internal_inconsistency",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed remote operation: classification plus human context.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct WriteError {
    kind: ErrorKind,
    message: String,
}

impl WriteError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The failure classification.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a fresh attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// One ballot response in a self-election round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotResponse {
    /// The voter's identity
    pub voter: NodeId,
    /// The term the vote applies to; a response carrying any other term
    /// than the ballot's is discarded by the candidate
    pub term: Term,
    /// Whether the vote was granted
    pub granted: bool,
}

/// Requests this core sends through the transport seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcRequest {
    /// Insert one document into a collection on the authoritative store
    Insert {
        collection: String,
        document: WriteDocument,
    },
    /// Point read by unique key, used only for write reconciliation
    FindByKey {
        collection: String,
        key: serde_json::Value,
    },
    /// Ask a voting member to acknowledge a primary claim for a term
    RequestBallot { candidate: NodeId, term: Term },
}

/// Responses the transport seam can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcResponse {
    /// The write was applied and acknowledged
    WriteAck,
    /// The documents matching a point read (empty when none matched)
    Documents(Vec<WriteDocument>),
    /// A ballot response from one voter
    Ballot(BallotResponse),
}
