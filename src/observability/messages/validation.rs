// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph validation outcomes.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The graph passed every structural check.
///
/// # Log Level
/// `debug!` - Routine confirmation
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::validation::GraphValidated;
///
/// let msg = GraphValidated {
///     node_count: 4,
///     root_count: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct GraphValidated {
    pub node_count: usize,
    pub root_count: usize,
}

impl Display for GraphValidated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph validated: {} nodes, {} roots",
            self.node_count, self.root_count
        )
    }
}

impl StructuredLog for GraphValidated {
    fn log(&self) {
        tracing::debug!(
            node_count = self.node_count,
            root_count = self.root_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_validated",
            span_name = name,
            node_count = self.node_count,
            root_count = self.root_count,
        )
    }
}

/// The graph was rejected.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dagstream::errors::ValidationError;
/// use the_dagstream::observability::messages::validation::ValidationFailed;
///
/// let error = ValidationError::DuplicateName { name: "A".to_string() };
/// let msg = ValidationFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ValidationFailed<'a> {
    pub error: &'a ValidationError,
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph validation failed: {}", self.error)
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("validation_failed", span_name = name, error = %self.error)
    }
}
