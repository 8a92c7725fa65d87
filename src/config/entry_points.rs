/// A type-safe wrapper for DAG entry points - nodes with no parents.
///
/// Entry points are the roots of the runtime forest: each one receives its own
/// cancellation scope, and start, stop and snapshot traversals begin from them.
///
/// # Examples
///
/// ## Deriving entry points from a graph
/// ```
/// use the_dagstream::config::{Graph, NodeSpec};
///
/// let graph = Graph::new()
///     .with_node("gen", NodeSpec::new("source/sequence"))
///     .with_node("sink", NodeSpec::new("sink/printer").with_parents(["gen"]));
///
/// let entry_points = graph.entry_points();
/// assert_eq!(entry_points.0, vec!["gen".to_string()]);
/// ```
///
/// ## Building entry points incrementally
/// ```
/// use the_dagstream::config::EntryPoints;
///
/// let mut entry_points = EntryPoints::new();
/// entry_points.add("clicks".to_string());
/// entry_points.add("impressions".to_string());
///
/// assert_eq!(entry_points.len(), 2);
/// assert!(entry_points.iter().any(|name| name == "clicks"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoints(pub Vec<String>);

impl EntryPoints {
    /// Create a new empty entrypoints list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an entrypoint
    pub fn add(&mut self, node: String) {
        self.0.push(node);
    }

    /// Get iterator over entrypoints
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for EntryPoints {
    fn from(entrypoints: Vec<String>) -> Self {
        Self(entrypoints)
    }
}
