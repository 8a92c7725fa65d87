// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod entry_points;
mod loader;
mod operator_config;
mod options;
mod registry;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use dependency_graph::DependencyGraph;
pub use entry_points::EntryPoints;
pub use loader::{
    load_and_validate_graph, load_graph, load_graph_file, load_graph_from_str, Graph,
    GraphDocument, NodeSpec,
};
pub use operator_config::decode_operator_config;
pub use options::EngineOptions;
pub use registry::OperatorRegistry;
pub use validation::validate_graph;
