//! RPC Vocabulary and Transport Seam
//!
//! Typed requests, responses, and error kinds shared by the election and
//! write paths, plus the transport trait that performs the actual
//! network calls. No wire encoding lives here; that belongs to transport
//! implementations.

mod deadline;
mod message;
mod transport;

pub use deadline::Deadline;
pub use message::{BallotResponse, ErrorKind, RpcRequest, RpcResponse, WriteError};
pub use transport::{ScriptStep, ScriptedTransport, Transport, TransportFuture};
