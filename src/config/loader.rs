// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_PARALLELS, DEFAULT_QUEUE_SIZE};
use crate::config::{DependencyGraph, EntryPoints};
use crate::errors::{ConfigError, LoadError};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Top-level graph document.
///
/// The document wraps the node mapping in an `engine` key so that other
/// sections can live next to it without colliding with node names.
///
/// # Example
/// ```yaml
/// engine:
///   Gen:
///     module: source/sequence
///     parent: []
///     queueSize: 16
///     parallels: 1
///     config:
///       start: 0
///       step: 100
///   Printer:
///     module: sink/printer
///     parent: [Gen]
///     queueSize: 16
///     parallels: 2
/// ```
#[derive(Debug, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub engine: Graph,
}

/// Configuration for a single node in the DAG.
///
/// # Fields
/// * `module` - Operator type name, resolved through the operator registry
/// * `parent` - Names of the nodes feeding this one; empty for a root
/// * `queue_size` - Capacity of the bounded input queue (`queueSize` in documents)
/// * `parallels` - Number of concurrent workers running the operator
/// * `config` - Operator-specific configuration, passed through unparsed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub module: String,
    #[serde(default)]
    pub parent: Vec<String>,
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    #[serde(default = "default_parallels")]
    pub parallels: usize,
    #[serde(default)]
    pub config: serde_yaml::Value,
}

fn default_queue_size() -> usize {
    DEFAULT_QUEUE_SIZE
}

fn default_parallels() -> usize {
    DEFAULT_PARALLELS
}

impl NodeSpec {
    /// Create a spec with one queue slot, one worker and no configuration.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            parent: Vec::new(),
            queue_size: DEFAULT_QUEUE_SIZE,
            parallels: DEFAULT_PARALLELS,
            config: serde_yaml::Value::Null,
        }
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    pub fn with_parallels(mut self, parallels: usize) -> Self {
        self.parallels = parallels;
        self
    }

    pub fn with_config(mut self, config: serde_yaml::Value) -> Self {
        self.config = config;
        self
    }

    /// A node without parents is an entry point of the graph.
    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Node name → node spec mapping, kept in document order.
///
/// Entries are stored as a list rather than a map so that a name declared twice
/// in the source document survives decoding and can be reported by the
/// validator instead of being silently overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<(String, NodeSpec)>,
}

impl Graph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node. Duplicate names are kept and rejected later by validation.
    pub fn insert(&mut self, name: impl Into<String>, spec: NodeSpec) {
        self.nodes.push((name.into(), spec));
    }

    /// Builder-style variant of [`Graph::insert`].
    pub fn with_node(mut self, name: impl Into<String>, spec: NodeSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over `(name, spec)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeSpec)> {
        self.nodes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Look up the first node declared under `name`.
    pub fn get(&self, name: &str) -> Option<&NodeSpec> {
        self.nodes
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of the parentless nodes, in document order.
    pub fn entry_points(&self) -> EntryPoints {
        self.iter()
            .filter(|(_, spec)| spec.is_root())
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>()
            .into()
    }

    /// Forward adjacency (parent → children) derived from the parent lists.
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from(self)
    }
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = Graph;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of node name to node spec")
            }

            fn visit_unit<E>(self) -> Result<Graph, E> {
                Ok(Graph::new())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Graph, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut graph = Graph::new();
                while let Some((name, spec)) = map.next_entry::<String, NodeSpec>()? {
                    graph.insert(name, spec);
                }
                Ok(graph)
            }
        }

        deserializer.deserialize_map(GraphVisitor)
    }
}

/// Decode a graph document from any reader (YAML, or JSON as a YAML subset).
pub fn load_graph<R: Read>(reader: R) -> Result<Graph, LoadError> {
    let document: GraphDocument = serde_yaml::from_reader(reader)?;
    Ok(document.engine)
}

/// Decode a graph document held in memory.
pub fn load_graph_from_str(content: &str) -> Result<Graph, LoadError> {
    let document: GraphDocument = serde_yaml::from_str(content)?;
    Ok(document.engine)
}

/// Load a graph document from a YAML file.
pub fn load_graph_file<P: AsRef<Path>>(path: P) -> Result<Graph, LoadError> {
    let file = File::open(path)?;
    load_graph(BufReader::new(file))
}

/// Load a graph document from a file and validate it.
///
/// The graph is returned only if it is a well-formed DAG; see
/// [`validate_graph`](crate::config::validate_graph) for the checks applied.
pub fn load_and_validate_graph<P: AsRef<Path>>(path: P) -> Result<Graph, ConfigError> {
    let graph = load_graph_file(path)?;
    crate::config::validate_graph(&graph)?;
    Ok(graph)
}
