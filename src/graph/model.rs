use std::collections::{HashMap, HashSet};

use super::payload::GraphPayload;

pub const UNGROUPED: &str = "ungrouped";

/// One extracted causal variable.
#[derive(Clone, Debug)]
pub struct CausalNode {
    pub id: String,
    pub group: String,
    pub is_core: bool,
}

/// Directed edge between two canonical node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
}

/// Concept regrouping signal from the cluster editor: a variable moved
/// from one concept group to another. Affects coloring only.
#[derive(Clone, Debug)]
pub struct RegroupEvent {
    pub moved_node_id: String,
    pub from_group: String,
    pub to_group: String,
}

/// Canonical graph for one analysis result. Replaced atomically when a
/// new payload arrives; the only in-place mutation is regrouping.
#[derive(Clone, Debug, Default)]
pub struct CausalGraph {
    pub nodes: Vec<CausalNode>,
    pub edges: Vec<GraphEdge>,
}

impl CausalGraph {
    /// Ingest a payload, resolving edge endpoints by node id. Edges whose
    /// source or target id is unknown are dropped silently, as are
    /// self-edges and duplicates; a best-effort visualization never
    /// rejects a payload over a bad edge.
    pub fn from_payload(payload: &GraphPayload) -> Self {
        let mut index_by_id: HashMap<&str, usize> = HashMap::with_capacity(payload.nodes.len());
        let mut nodes = Vec::with_capacity(payload.nodes.len());

        for raw in &payload.nodes {
            if index_by_id.contains_key(raw.id.as_str()) {
                continue;
            }
            let group = payload
                .groups
                .get(&raw.id)
                .cloned()
                .unwrap_or_else(|| UNGROUPED.to_string());
            index_by_id.insert(raw.id.as_str(), nodes.len());
            nodes.push(CausalNode {
                id: raw.id.clone(),
                group,
                is_core: raw.is_core,
            });
        }

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for raw in &payload.edges {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(raw.source.as_str()),
                index_by_id.get(raw.target.as_str()),
            ) else {
                continue;
            };
            if source == target {
                continue;
            }
            if seen.insert((source, target)) {
                edges.push(GraphEdge { source, target });
            }
        }

        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Apply a regrouping event. Returns true if the node was found and
    /// its group changed. `from_group` is informational; the event is
    /// applied by id regardless, so a stale editor state cannot wedge
    /// the coloring.
    pub fn apply_regroup(&mut self, event: &RegroupEvent) -> bool {
        let Some(node) = self
            .nodes
            .iter_mut()
            .find(|node| node.id == event.moved_node_id)
        else {
            return false;
        };
        if node.group == event.to_group {
            return false;
        }
        node.group = event.to_group.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::payload::{PayloadEdge, PayloadNode};

    fn payload(nodes: &[(&str, bool)], edges: &[(&str, &str)]) -> GraphPayload {
        GraphPayload {
            nodes: nodes
                .iter()
                .map(|&(id, is_core)| PayloadNode {
                    id: id.to_string(),
                    is_core,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|&(source, target)| PayloadEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                })
                .collect(),
            groups: HashMap::new(),
        }
    }

    #[test]
    fn drops_dangling_edges() {
        let graph = CausalGraph::from_payload(&payload(
            &[("A", false), ("B", false)],
            &[("A", "B"), ("A", "C"), ("D", "B")],
        ));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges, vec![GraphEdge { source: 0, target: 1 }]);
    }

    #[test]
    fn drops_self_edges_and_duplicates() {
        let graph = CausalGraph::from_payload(&payload(
            &[("A", false), ("B", false)],
            &[("A", "A"), ("A", "B"), ("A", "B")],
        ));
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn first_duplicate_node_id_wins() {
        let graph =
            CausalGraph::from_payload(&payload(&[("A", true), ("A", false)], &[]));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.nodes[0].is_core);
    }

    #[test]
    fn groups_resolve_from_payload_mapping() {
        let mut raw = payload(&[("A", false), ("B", false)], &[]);
        raw.groups.insert("A".to_string(), "economic".to_string());
        let graph = CausalGraph::from_payload(&raw);
        assert_eq!(graph.nodes[0].group, "economic");
        assert_eq!(graph.nodes[1].group, UNGROUPED);
    }

    #[test]
    fn regroup_rewrites_group_by_id() {
        let mut graph = CausalGraph::from_payload(&payload(&[("A", false)], &[]));
        let applied = graph.apply_regroup(&RegroupEvent {
            moved_node_id: "A".to_string(),
            from_group: UNGROUPED.to_string(),
            to_group: "policy".to_string(),
        });
        assert!(applied);
        assert_eq!(graph.nodes[0].group, "policy");

        let missing = graph.apply_regroup(&RegroupEvent {
            moved_node_id: "nope".to_string(),
            from_group: "policy".to_string(),
            to_group: "other".to_string(),
        });
        assert!(!missing);
    }
}
