// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{DependencyGraph, Graph, OperatorRegistry};
use crate::engine::node::{NodeId, NodeKey, RuntimeNode, RuntimeSettings, Topology};
use crate::errors::BuildError;
use crate::observability::messages::engine::{NodeMaterialized, NodeReused};
use crate::observability::messages::StructuredLog;

/// Materializes a validated graph into a [`Topology`].
///
/// Traversal starts at each root (in document order) and walks parent → child
/// edges depth-first. Every distinct (operator type, node name) pair is
/// instantiated exactly once: the first traversal to reach a node creates it,
/// and later parents only gain an edge to the existing node. A shared node is
/// therefore bound to the cancellation scope of the root that reached it first.
///
/// The builder expects a graph that passed
/// [`validate_graph`](crate::config::validate_graph).
pub(crate) struct DagBuilder<'a> {
    graph: &'a Graph,
    registry: &'a OperatorRegistry,
    dependents: DependencyGraph,
    qps_window_capacity: usize,
    memo: HashMap<NodeKey, NodeId>,
    nodes: Vec<RuntimeNode>,
}

impl<'a> DagBuilder<'a> {
    pub(crate) fn new(
        graph: &'a Graph,
        registry: &'a OperatorRegistry,
        qps_window_capacity: usize,
    ) -> Self {
        Self {
            graph,
            registry,
            dependents: graph.dependency_graph(),
            qps_window_capacity,
            memo: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Build the forest. Each root gets its own child scope of `parent`.
    ///
    /// Any failure aborts the whole build; nothing has been started yet, so
    /// the partially built nodes are simply dropped.
    pub(crate) fn build(
        mut self,
        parent: &CancellationToken,
        settings: RuntimeSettings,
    ) -> Result<Arc<Topology>, BuildError> {
        let mut roots = Vec::new();
        for root in self.graph.entry_points().iter() {
            let scope = parent.child_token();
            roots.push(self.materialize(root, &scope)?);
        }
        Ok(Arc::new(Topology::new(self.nodes, roots, settings)))
    }

    fn materialize(&mut self, name: &str, scope: &CancellationToken) -> Result<NodeId, BuildError> {
        let spec = self.graph.get(name).ok_or_else(|| BuildError::UnknownNode {
            node: name.to_string(),
        })?;

        let key = NodeKey::new(spec.module.as_str(), name);
        if let Some(&id) = self.memo.get(&key) {
            return Ok(id);
        }

        let factory = self
            .registry
            .lookup(&spec.module)
            .map_err(|_| BuildError::UnknownOperator {
                node: name.to_string(),
                operator: spec.module.clone(),
            })?;
        let instance =
            factory
                .create(name, &spec.config)
                .map_err(|source| BuildError::OperatorConstruction {
                    node: name.to_string(),
                    operator: spec.module.clone(),
                    source,
                })?;

        let label = key.to_string();
        NodeMaterialized {
            node: &label,
            parallels: spec.parallels,
            queue_size: spec.queue_size,
        }
        .log();

        let id = self.nodes.len();
        self.nodes.push(RuntimeNode::new(
            key.clone(),
            spec.parallels,
            spec.queue_size,
            factory,
            instance,
            scope.clone(),
            self.qps_window_capacity,
        ));
        self.memo.insert(key, id);

        let children = self.dependents.get_dependents(name).to_vec();
        for child in children {
            let reused = self.is_materialized(&child);
            let child_id = self.materialize(&child, scope)?;
            if reused {
                NodeReused {
                    node: &self.nodes[child_id].key.to_string(),
                    parent: &label,
                }
                .log();
            }
            self.nodes[id].downstream.push(child_id);
        }

        Ok(id)
    }

    fn is_materialized(&self, name: &str) -> bool {
        self.graph
            .get(name)
            .map(|spec| self.memo.contains_key(&NodeKey::new(spec.module.as_str(), name)))
            .unwrap_or(false)
    }
}
