use std::collections::HashMap;

use crate::config::Graph;

/// Newtype wrapper for the forward adjacency of a graph: node name → children.
///
/// Children are kept in document order and without repetition, which makes
/// them the broadcast order of the node they belong to.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Make sure a node is present even if nothing depends on it
    pub fn add_node(&mut self, node: &str) {
        self.0.entry(node.to_string()).or_default();
    }

    /// Record that `dependent` consumes the output of `node`
    pub fn add_dependent(&mut self, node: &str, dependent: &str) {
        let dependents = self.0.entry(node.to_string()).or_default();
        if !dependents.iter().any(|existing| existing == dependent) {
            dependents.push(dependent.to_string());
        }
    }

    /// Get dependents for a node; empty when the node is a sink or unknown
    pub fn get_dependents(&self, node: &str) -> &[String] {
        self.0.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct parents per node
    pub fn indegrees(&self) -> HashMap<&str, usize> {
        let mut indegrees: HashMap<&str, usize> =
            self.0.keys().map(|node| (node.as_str(), 0)).collect();
        for dependent in self.0.values().flatten() {
            *indegrees.entry(dependent.as_str()).or_insert(0) += 1;
        }
        indegrees
    }
}

impl From<&Graph> for DependencyGraph {
    fn from(graph: &Graph) -> Self {
        let mut dependency_graph = DependencyGraph::new();
        for (name, spec) in graph.iter() {
            dependency_graph.add_node(name);
            for parent in &spec.parent {
                dependency_graph.add_dependent(parent, name);
            }
        }
        dependency_graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeSpec;

    #[test]
    fn children_follow_document_order() {
        let graph = Graph::new()
            .with_node("A", NodeSpec::new("m"))
            .with_node("C", NodeSpec::new("m").with_parents(["A"]))
            .with_node("B", NodeSpec::new("m").with_parents(["A"]));

        let deps = graph.dependency_graph();
        assert_eq!(deps.get_dependents("A"), ["C".to_string(), "B".to_string()]);
        assert!(deps.get_dependents("B").is_empty());
        assert!(deps.get_dependents("missing").is_empty());
    }

    #[test]
    fn repeated_parent_is_a_single_edge() {
        let graph = Graph::new()
            .with_node("A", NodeSpec::new("m"))
            .with_node("B", NodeSpec::new("m").with_parents(["A", "A"]));

        let deps = graph.dependency_graph();
        assert_eq!(deps.get_dependents("A").len(), 1);
        assert_eq!(deps.indegrees()["B"], 1);
        assert_eq!(deps.indegrees()["A"], 0);
    }
}
