//! Network Transport Seam
//!
//! The only suspension points in this crate are the futures returned
//! here. One call, one timeout, one typed result; cancellation never
//! reaches into an in-flight call.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use super::message::{ErrorKind, RpcRequest, RpcResponse, WriteError};
use crate::cluster::Host;

/// Future type produced by the transport seam.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RpcResponse, WriteError>> + Send + 'a>>;

/// Performs one network call with a timeout.
///
/// Implementations own connection handling, encoding, and the timeout
/// mechanics; callers own retry policy. A timeout surfaces as
/// `ErrorKind::NetworkTimeout`, never as a hung future.
pub trait Transport: Send + Sync {
    /// Send one request to one host.
    fn send<'a>(
        &'a self,
        host: &'a Host,
        request: RpcRequest,
        timeout: Duration,
    ) -> TransportFuture<'a>;
}

/// One step of a transport script: inspects the outgoing request and
/// produces the programmed result.
pub type ScriptStep =
    Box<dyn FnOnce(&Host, &RpcRequest) -> Result<RpcResponse, WriteError> + Send>;

/// A transport driven by an explicit script of expected calls.
///
/// Each `expect` enqueues a closure consumed by exactly one `send`, in
/// order; assertions about the target and request live inside the
/// closure. An unscripted call fails `InternalInconsistency` so a test
/// that over-sends fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<ScriptStep>>,
}

impl ScriptedTransport {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue the handler for the next call.
    pub fn expect<F>(&self, step: F)
    where
        F: FnOnce(&Host, &RpcRequest) -> Result<RpcResponse, WriteError> + Send + 'static,
    {
        self.steps.lock().unwrap().push_back(Box::new(step));
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(
        &'a self,
        host: &'a Host,
        request: RpcRequest,
        _timeout: Duration,
    ) -> TransportFuture<'a> {
        let step = self.steps.lock().unwrap().pop_front();
        let result = match step {
            Some(step) => step(host, &request),
            None => Err(WriteError::new(
                ErrorKind::InternalInconsistency,
                "transport script exhausted",
            )),
        };
        Box::pin(async move { result })
    }
}
