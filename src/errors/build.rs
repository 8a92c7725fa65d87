// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for DAG materialization and operator instantiation.

use thiserror::Error;

/// Errors that can occur while materializing a validated graph into runtime nodes.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The node names an operator type that nobody registered
    #[error("Node '{node}' uses operator '{operator}' which is not registered")]
    UnknownOperator { node: String, operator: String },

    /// The operator factory rejected the node's configuration
    #[error("Failed to construct operator '{operator}' for node '{node}': {source:#}")]
    OperatorConstruction {
        node: String,
        operator: String,
        #[source]
        source: anyhow::Error,
    },

    /// The builder was asked for a node the graph does not declare
    #[error("Node '{node}' is not declared in the graph")]
    UnknownNode { node: String },
}
