// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for node worker lifecycle and delivery events.
//!
//! This module contains message types for logging events related to:
//! * Worker pools starting and draining
//! * Operator failures inside a worker
//! * Slow downstream deliveries (backpressure)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A node launched its worker pool.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::node::ModuleStarted;
///
/// let msg = ModuleStarted {
///     node: "source/sequence[numbers]",
///     parallels: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleStarted<'a> {
    pub node: &'a str,
    pub parallels: usize,
}

impl Display for ModuleStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module {} started with {} workers", self.node, self.parallels)
    }
}

impl StructuredLog for ModuleStarted<'_> {
    fn log(&self) {
        tracing::info!(module = self.node, parallels = self.parallels, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module",
            span_name = name,
            module = self.node,
            parallels = self.parallels,
            worker = tracing::field::Empty,
        )
    }
}

/// The last worker of a node returned.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ModuleStopped<'a> {
    pub node: &'a str,
    pub received: u64,
    pub sent: u64,
}

impl Display for ModuleStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module {} stopped: received={}, sent={}",
            self.node, self.received, self.sent
        )
    }
}

impl StructuredLog for ModuleStopped<'_> {
    fn log(&self) {
        tracing::info!(
            module = self.node,
            received = self.received,
            sent = self.sent,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module_stopped",
            span_name = name,
            module = self.node,
            received = self.received,
            sent = self.sent,
        )
    }
}

/// An operator returned an error from one worker.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::node::WorkerFailed;
///
/// let error = anyhow::anyhow!("connection reset");
/// let msg = WorkerFailed {
///     node: "sink/printer[out]",
///     worker: 0,
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerFailed<'a> {
    pub node: &'a str,
    pub worker: usize,
    pub error: &'a anyhow::Error,
}

impl Display for WorkerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} of module {} failed: {:#}",
            self.worker, self.node, self.error
        )
    }
}

impl StructuredLog for WorkerFailed<'_> {
    fn log(&self) {
        tracing::error!(
            module = self.node,
            worker = self.worker,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker_failed",
            span_name = name,
            module = self.node,
            worker = self.worker,
        )
    }
}

/// A collect call spent longer than the slow threshold pushing to one downstream.
///
/// # Log Level
/// `warn!` - Degraded throughput
pub struct BackpressureDetected<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub elapsed: Duration,
}

impl Display for BackpressureDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Backpressure detected: {} -> {} took {:?}",
            self.from, self.to, self.elapsed
        )
    }
}

impl StructuredLog for BackpressureDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            from = self.from,
            to = self.to,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "backpressure",
            span_name = name,
            from = self.from,
            to = self.to,
            elapsed_ms = self.elapsed.as_millis() as u64,
        )
    }
}
