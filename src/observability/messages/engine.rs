// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine lifecycle and graph materialization events.
//!
//! This module contains message types for logging events related to:
//! * Engine start and stop
//! * Node materialization during graph build
//! * Node reuse when several parents share a downstream

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The engine built its topology and launched the root nodes.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::engine::EngineStarted;
///
/// let msg = EngineStarted {
///     node_count: 3,
///     root_count: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineStarted {
    pub node_count: usize,
    pub root_count: usize,
}

impl Display for EngineStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine started: {} nodes materialized from {} roots",
            self.node_count, self.root_count
        )
    }
}

impl StructuredLog for EngineStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            root_count = self.root_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine",
            span_name = name,
            node_count = self.node_count,
            root_count = self.root_count,
        )
    }
}

/// The engine cancelled its roots and returned to idle.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineStopped {
    pub node_count: usize,
}

impl Display for EngineStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine stopped: cancelled {} nodes", self.node_count)
    }
}

impl StructuredLog for EngineStopped {
    fn log(&self) {
        tracing::info!(node_count = self.node_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_stopped", span_name = name, node_count = self.node_count)
    }
}

/// A node was instantiated for the first time during a build.
///
/// # Log Level
/// `debug!` - Build detail
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::engine::NodeMaterialized;
///
/// let msg = NodeMaterialized {
///     node: "sink/printer[out]",
///     parallels: 2,
///     queue_size: 16,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct NodeMaterialized<'a> {
    pub node: &'a str,
    pub parallels: usize,
    pub queue_size: usize,
}

impl Display for NodeMaterialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Materialized node {}: parallels={}, queue_size={}",
            self.node, self.parallels, self.queue_size
        )
    }
}

impl StructuredLog for NodeMaterialized<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            parallels = self.parallels,
            queue_size = self.queue_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_materialized",
            span_name = name,
            node = self.node,
            parallels = self.parallels,
            queue_size = self.queue_size,
        )
    }
}

/// An already materialized node was attached to another parent.
///
/// # Log Level
/// `debug!` - Build detail
pub struct NodeReused<'a> {
    pub node: &'a str,
    pub parent: &'a str,
}

impl Display for NodeReused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Reusing node {} as downstream of {}", self.node, self.parent)
    }
}

impl StructuredLog for NodeReused<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, parent = self.parent, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_reused",
            span_name = name,
            node = self.node,
            parent = self.parent,
        )
    }
}
