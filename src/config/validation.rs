//! Graph validation for DAG integrity.
//!
//! A graph document must describe a well-formed DAG before the builder is
//! allowed to touch it. Validation runs a fixed pipeline and stops at the
//! first failure, so the caller always receives exactly one error naming the
//! offending node.
//!
//! # Validation Pipeline
//!
//! 1. **Name uniqueness**: every node name is declared once
//! 2. **Referential integrity**: every `parent` entry names a declared node
//! 3. **Acyclicity**: Kahn's algorithm removes every node
//! 4. **Node settings**: `queueSize` and `parallels` are at least 1
//!
//! Cycle detection depends on the first two checks: indegrees are only
//! meaningful once names are unique and every edge points at a real node.
//!
//! # Algorithms
//!
//! ## Cycle Detection
//! Uses **Kahn's algorithm** over the forward adjacency:
//! - **Time Complexity**: O(V + E)
//! - **Space Complexity**: O(V)
//! - **Tie-break**: zero-indegree nodes are drained in document order, although
//!   the verdict does not depend on the order
//!
//! # Examples
//!
//! ```rust
//! use the_dagstream::config::{validate_graph, Graph, NodeSpec};
//! use the_dagstream::errors::ValidationError;
//!
//! let graph = Graph::new()
//!     .with_node("gen", NodeSpec::new("source/sequence"))
//!     .with_node("sink", NodeSpec::new("sink/printer").with_parents(["missing"]));
//!
//! match validate_graph(&graph) {
//!     Err(ValidationError::UnknownParent { node, parent }) => {
//!         assert_eq!(node, "sink");
//!         assert_eq!(parent, "missing");
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::Graph;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{GraphValidated, ValidationFailed};
use crate::observability::messages::StructuredLog;

/// Validates a graph for structural integrity.
///
/// # Returns
///
/// * `Ok(())` - The graph is a DAG and every node can be materialized
/// * `Err(ValidationError)` - The first check that failed
pub fn validate_graph(graph: &Graph) -> Result<(), ValidationError> {
    let result = validate_unique_names(graph)
        .and_then(|_| validate_parent_references(graph))
        .and_then(|_| validate_acyclic_graph(graph))
        .and_then(|_| validate_node_settings(graph));

    match &result {
        Ok(()) => GraphValidated {
            node_count: graph.len(),
            root_count: graph.entry_points().len(),
        }
        .log(),
        Err(error) => ValidationFailed { error }.log(),
    }

    result
}

fn validate_unique_names(graph: &Graph) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (name, _) in graph.iter() {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_parent_references(graph: &Graph) -> Result<(), ValidationError> {
    let names: HashSet<&str> = graph.iter().map(|(name, _)| name).collect();
    for (name, spec) in graph.iter() {
        if let Some(parent) = spec.parent.iter().find(|p| !names.contains(p.as_str())) {
            return Err(ValidationError::UnknownParent {
                node: name.to_string(),
                parent: parent.clone(),
            });
        }
    }
    Ok(())
}

/// Kahn's algorithm: repeatedly remove a node whose parents have all been
/// removed. Whatever survives the sweep sits on, or behind, a cycle.
fn validate_acyclic_graph(graph: &Graph) -> Result<(), ValidationError> {
    let dependents = graph.dependency_graph();
    let mut indegrees: HashMap<&str, usize> = dependents.indegrees();

    let mut ready: VecDeque<&str> = graph
        .iter()
        .map(|(name, _)| name)
        .filter(|name| indegrees.get(name).copied().unwrap_or(0) == 0)
        .collect();
    let mut removed = 0;

    while let Some(node) = ready.pop_front() {
        removed += 1;
        for child in dependents.get_dependents(node) {
            if let Some(degree) = indegrees.get_mut(child.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(child.as_str());
                }
            }
        }
    }

    if removed == graph.len() {
        return Ok(());
    }

    let remaining = graph
        .iter()
        .map(|(name, _)| name)
        .filter(|name| indegrees.get(name).copied().unwrap_or(0) > 0)
        .map(str::to_string)
        .collect();
    Err(ValidationError::CycleDetected { remaining })
}

fn validate_node_settings(graph: &Graph) -> Result<(), ValidationError> {
    for (name, spec) in graph.iter() {
        if spec.queue_size == 0 {
            return Err(ValidationError::InvalidQueueSize {
                node: name.to_string(),
                queue_size: spec.queue_size,
            });
        }
        if spec.parallels == 0 {
            return Err(ValidationError::InvalidParallels {
                node: name.to_string(),
                parallels: spec.parallels,
            });
        }
    }
    Ok(())
}
