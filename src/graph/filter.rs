use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::model::CausalGraph;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    All,
    CoreOnly,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All variables",
            Self::CoreOnly => "Core variables",
        }
    }
}

#[derive(Clone, Debug)]
pub struct WorkingNode {
    pub id: String,
    pub group: String,
    pub is_core: bool,
    /// Index into [`WorkingGraph::groups`], assigned by first-seen order.
    pub palette_slot: usize,
}

/// The node/edge subset currently active for simulation and rendering.
///
/// Derived from the canonical graph and the display mode; recomputed on
/// either changing. Edge endpoints always survive the projection, so a
/// working graph can never reference a filtered-out node.
#[derive(Clone, Debug, Default)]
pub struct WorkingGraph {
    pub nodes: Vec<WorkingNode>,
    pub edges: Vec<(usize, usize)>,
    pub index_by_id: HashMap<String, usize>,
    /// Undirected adjacency over working indices.
    pub neighbors: Vec<Vec<usize>>,
    /// Distinct group names in first-seen order; the color palette keys
    /// off this, so coloring is stable for a given working graph.
    pub groups: Vec<String>,
    /// Identity over node ids and edge pairs. Group names are excluded
    /// deliberately: regrouping must recolor without resetting layout.
    pub signature: u64,
}

impl WorkingGraph {
    pub fn project(graph: &CausalGraph, mode: DisplayMode) -> Self {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut nodes = Vec::new();
        let mut index_by_id = HashMap::new();
        let mut groups: Vec<String> = Vec::new();

        for (canonical, node) in graph.nodes.iter().enumerate() {
            if mode == DisplayMode::CoreOnly && !node.is_core {
                continue;
            }
            let palette_slot = match groups.iter().position(|group| group == &node.group) {
                Some(slot) => slot,
                None => {
                    groups.push(node.group.clone());
                    groups.len() - 1
                }
            };
            remap.insert(canonical, nodes.len());
            index_by_id.insert(node.id.clone(), nodes.len());
            nodes.push(WorkingNode {
                id: node.id.clone(),
                group: node.group.clone(),
                is_core: node.is_core,
                palette_slot,
            });
        }

        let mut edges = Vec::new();
        for edge in &graph.edges {
            if let (Some(&source), Some(&target)) =
                (remap.get(&edge.source), remap.get(&edge.target))
            {
                edges.push((source, target));
            }
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for &(source, target) in &edges {
            neighbors[source].push(target);
            neighbors[target].push(source);
        }

        let mut hasher = DefaultHasher::new();
        for node in &nodes {
            node.id.hash(&mut hasher);
        }
        edges.hash(&mut hasher);
        let signature = hasher.finish();

        Self {
            nodes,
            edges,
            index_by_id,
            neighbors,
            groups,
            signature,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{CausalNode, GraphEdge};

    fn canonical(nodes: &[(&str, &str, bool)], edges: &[(usize, usize)]) -> CausalGraph {
        CausalGraph {
            nodes: nodes
                .iter()
                .map(|&(id, group, is_core)| CausalNode {
                    id: id.to_string(),
                    group: group.to_string(),
                    is_core,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|&(source, target)| GraphEdge { source, target })
                .collect(),
        }
    }

    #[test]
    fn all_mode_keeps_everything_in_order() {
        let graph = canonical(
            &[("A", "g1", true), ("B", "g2", false)],
            &[(0, 1)],
        );
        let working = WorkingGraph::project(&graph, DisplayMode::All);
        assert_eq!(working.node_count(), 2);
        assert_eq!(working.edges, vec![(0, 1)]);
        assert_eq!(working.nodes[0].id, "A");
        assert_eq!(working.nodes[1].id, "B");
    }

    #[test]
    fn core_only_drops_edges_with_filtered_endpoints() {
        let graph = canonical(
            &[("A", "g1", true), ("B", "g1", false)],
            &[(0, 1)],
        );
        let working = WorkingGraph::project(&graph, DisplayMode::CoreOnly);
        assert_eq!(working.node_count(), 1);
        assert_eq!(working.nodes[0].id, "A");
        assert!(working.edges.is_empty());
    }

    #[test]
    fn palette_slots_follow_first_seen_group_order() {
        let graph = canonical(
            &[
                ("A", "late", false),
                ("B", "early", false),
                ("C", "late", false),
            ],
            &[],
        );
        let working = WorkingGraph::project(&graph, DisplayMode::All);
        assert_eq!(working.groups, vec!["late".to_string(), "early".to_string()]);
        assert_eq!(working.nodes[0].palette_slot, 0);
        assert_eq!(working.nodes[1].palette_slot, 1);
        assert_eq!(working.nodes[2].palette_slot, 0);
    }

    #[test]
    fn signature_ignores_group_changes() {
        let mut graph = canonical(&[("A", "g1", false), ("B", "g1", false)], &[(0, 1)]);
        let before = WorkingGraph::project(&graph, DisplayMode::All).signature;
        graph.nodes[0].group = "g2".to_string();
        let after = WorkingGraph::project(&graph, DisplayMode::All).signature;
        assert_eq!(before, after);
    }

    #[test]
    fn signature_tracks_identity_changes() {
        let graph = canonical(&[("A", "g1", true), ("B", "g1", false)], &[(0, 1)]);
        let all = WorkingGraph::project(&graph, DisplayMode::All).signature;
        let core = WorkingGraph::project(&graph, DisplayMode::CoreOnly).signature;
        assert_ne!(all, core);
    }

    #[test]
    fn adjacency_is_undirected() {
        let graph = canonical(
            &[("A", "g", false), ("B", "g", false), ("C", "g", false)],
            &[(0, 1), (2, 0)],
        );
        let working = WorkingGraph::project(&graph, DisplayMode::All);
        assert_eq!(working.neighbors[0], vec![1, 2]);
        assert_eq!(working.neighbors[1], vec![0]);
        assert_eq!(working.neighbors[2], vec![0]);
    }
}
