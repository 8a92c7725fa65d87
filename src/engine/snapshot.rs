// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Read-only views of a running topology.
//!
//! A snapshot copies counters, queue occupancy and throughput windows at the
//! moment it is taken. Nodes keep running while it is captured, so values of
//! different nodes are not mutually consistent.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::fmt::Write;
use std::sync::atomic::Ordering;

use crate::engine::node::{NodeId, Topology};
use crate::engine::telemetry::QpsSamples;

/// Point-in-time view of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub operator: String,
    pub parallels: usize,
    pub active_workers: usize,
    pub queue_len: usize,
    pub queue_capacity: usize,
    pub received: u64,
    pub sent: u64,
    pub qps: QpsSamples,
}

/// A broadcast edge, labelled with the sender's completed `collect` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    pub from: String,
    pub to: String,
    pub sent: u64,
}

/// Point-in-time view of a whole topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    /// Walk the topology breadth-first from its roots.
    pub(crate) fn capture(topology: &Topology) -> Self {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut pending: VecDeque<NodeId> = topology.roots.iter().copied().collect();
        let mut snapshot = GraphSnapshot::default();

        while let Some(id) = pending.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let node = &topology.nodes[id];
            snapshot.nodes.push(NodeSnapshot {
                name: node.key.name.clone(),
                operator: node.key.operator.clone(),
                parallels: node.parallels,
                active_workers: node.active_workers.load(Ordering::Acquire),
                queue_len: node.queue.len(),
                queue_capacity: node.queue.capacity(),
                received: node.telemetry.received(),
                sent: node.telemetry.sent(),
                qps: node.telemetry.qps(),
            });

            let sent = node.telemetry.sent();
            for &child in &node.downstream {
                snapshot.edges.push(EdgeSnapshot {
                    from: node.key.name.clone(),
                    to: topology.nodes[child].key.name.clone(),
                    sent,
                });
                pending.push_back(child);
            }
        }

        snapshot
    }

    pub fn node(&self, name: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Render as a Graphviz DOT document.
    ///
    /// Each node is a record listing its receive count, queue capacity and
    /// length, mean in/out throughput and the raw throughput windows. Edges
    /// carry the sender's sent count.
    pub fn render_dot(&self) -> String {
        let mut dot = String::from("digraph dagstream {\n  rankdir=TB;\n");

        for node in &self.nodes {
            let _ = writeln!(
                dot,
                "  \"{}\" [shape=record, label=\"{{ {} | {{<c1> Receive | <c2> {} }} | {{<c1> QueueCap | <c2> {} }} | {{<c1> QueueSize | <c2> {} }} | {{ <c1> InQPS | <c2> {:.2} }} | {{ <c1> OutQPS | <c2> {:.2} }} | {{ <c1> InQPSArray | <c2> {} }} | {{ <c1> OutQPSArray | <c2> {} }} }}\"];",
                escape_id(&node.name),
                escape_label(&node.name),
                node.received,
                node.queue_capacity,
                node.queue_len,
                node.qps.mean_received(),
                node.qps.mean_sent(),
                join(&node.qps.received),
                join(&node.qps.sent),
            );
        }

        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "  \"{}\" -> \"{}\" [label=\"Sent: {}\"];",
                escape_id(&edge.from),
                escape_id(&edge.to),
                edge.sent
            );
        }

        dot.push_str("}\n");
        dot
    }
}

fn join(samples: &[u64]) -> String {
    samples
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" , ")
}

/// Escape a quoted DOT identifier.
fn escape_id(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text placed inside a record label, where braces, bars and angle
/// brackets are structural.
fn escape_label(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphSnapshot {
        GraphSnapshot {
            nodes: vec![
                NodeSnapshot {
                    name: "gen".to_string(),
                    operator: "source/sequence".to_string(),
                    parallels: 1,
                    active_workers: 1,
                    queue_len: 0,
                    queue_capacity: 4,
                    received: 0,
                    sent: 7,
                    qps: QpsSamples {
                        received: vec![0, 0],
                        sent: vec![3, 4],
                    },
                },
                NodeSnapshot {
                    name: "out|put".to_string(),
                    operator: "sink/printer".to_string(),
                    parallels: 2,
                    active_workers: 2,
                    queue_len: 1,
                    queue_capacity: 8,
                    received: 7,
                    sent: 0,
                    qps: QpsSamples::default(),
                },
            ],
            edges: vec![EdgeSnapshot {
                from: "gen".to_string(),
                to: "out|put".to_string(),
                sent: 7,
            }],
        }
    }

    #[test]
    fn test_render_dot_records_and_edges() {
        let dot = sample().render_dot();

        assert!(dot.starts_with("digraph dagstream {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("{<c1> Receive | <c2> 7 }"));
        assert!(dot.contains("{<c1> QueueCap | <c2> 8 }"));
        assert!(dot.contains("{ <c1> OutQPS | <c2> 3.50 }"));
        assert!(dot.contains("{ <c1> OutQPSArray | <c2> 3 , 4 }"));
        assert!(dot.contains("\"gen\" -> \"out|put\" [label=\"Sent: 7\"];"));
    }

    #[test]
    fn test_render_dot_escapes_record_syntax() {
        let dot = sample().render_dot();
        assert!(dot.contains("{ out\\|put |"));
    }

    #[test]
    fn test_empty_window_renders_zero_means() {
        let dot = sample().render_dot();
        assert!(dot.contains("{ <c1> InQPS | <c2> 0.00 }"));
    }

    #[test]
    fn test_node_lookup() {
        let snapshot = sample();
        assert_eq!(snapshot.node("gen").unwrap().sent, 7);
        assert!(snapshot.node("missing").is_none());
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nodes"][1]["queue_capacity"], 8);
        assert_eq!(json["edges"][0]["to"], "out|put");
    }
}
