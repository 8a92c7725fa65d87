// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors that can occur during graph validation.
///
/// Validation stops at the first failing check, so a single `ValidationError`
/// always describes exactly one problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The same node name appears more than once in the graph document
    #[error("Duplicate node name: '{name}'")]
    DuplicateName { name: String },

    /// A node lists a parent that is not declared anywhere in the graph
    #[error("Node '{node}' declares parent '{parent}' which does not exist")]
    UnknownParent { node: String, parent: String },

    /// The parent relation contains a cycle
    #[error("Cycle detected: nodes [{}] can never become ready", remaining.join(", "))]
    CycleDetected {
        /// Nodes still holding a non-zero indegree when the topological sweep stalled
        remaining: Vec<String>,
    },

    /// A node declares an input queue that cannot hold a single message
    #[error("Node '{node}' has queueSize {queue_size}; it must be at least 1")]
    InvalidQueueSize { node: String, queue_size: usize },

    /// A node declares no workers
    #[error("Node '{node}' has parallels {parallels}; it must be at least 1")]
    InvalidParallels { node: String, parallels: usize },
}

/// Errors raised while reading and decoding a graph document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read graph configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode graph configuration: {0}")]
    Decode(#[from] serde_yaml::Error),
}

/// Everything that can go wrong before a graph is handed to the builder.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationError),
}
