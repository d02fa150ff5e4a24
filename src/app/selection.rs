use std::collections::HashSet;
use std::mem;

use crate::graph::WorkingGraph;

/// Opacity applied to nodes and labels outside the selected
/// neighborhood. Low but nonzero so the structure stays readable.
pub const DIM_OPACITY: f32 = 0.1;
const EDGE_NEUTRAL_OPACITY: f32 = 0.6;
const EDGE_EMPHASIS_OPACITY: f32 = 0.9;

/// Change notifications for the embedding application (tooltip
/// rendering, panels outside this core).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    SelectionChanged(Option<String>),
    HoverChanged(Option<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Full,
    Dim,
}

impl Emphasis {
    pub fn opacity(self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Dim => DIM_OPACITY,
        }
    }
}

/// Hover/selection state machine for one graph panel.
///
/// Neutral, hover-preview, and selected states per panel; hover is a
/// tooltip-only preview while selection drives the emphasis split.
/// Indices refer to the current working graph and are cleared whenever
/// that graph's identity changes.
#[derive(Default)]
pub struct SelectionEngine {
    hovered: Option<usize>,
    selected: Option<usize>,
    /// Closed neighborhood of the selected node: itself plus everything
    /// sharing an edge with it in the working graph.
    neighborhood: HashSet<usize>,
    events: Vec<GraphEvent>,
}

impl SelectionEngine {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_hover(&mut self, working: &WorkingGraph, node: Option<usize>) {
        if self.hovered == node {
            return;
        }
        self.hovered = node;
        self.events.push(GraphEvent::HoverChanged(
            node.and_then(|index| working.nodes.get(index))
                .map(|node| node.id.clone()),
        ));
    }

    /// Select unconditionally (search navigation path). `None` clears.
    pub fn select(&mut self, working: &WorkingGraph, node: Option<usize>) {
        if self.selected == node {
            return;
        }
        self.selected = node;
        self.neighborhood = match node {
            Some(index) => {
                let mut closed: HashSet<usize> =
                    working.neighbors.get(index).into_iter().flatten().copied().collect();
                closed.insert(index);
                closed
            }
            None => HashSet::new(),
        };
        self.events.push(GraphEvent::SelectionChanged(
            node.and_then(|index| working.nodes.get(index))
                .map(|node| node.id.clone()),
        ));
    }

    /// Click semantics: a node click toggles its selection, an
    /// empty-canvas click clears it.
    pub fn click(&mut self, working: &WorkingGraph, node: Option<usize>) {
        match node {
            Some(index) if self.selected == Some(index) => self.select(working, None),
            Some(index) => self.select(working, Some(index)),
            None => self.select(working, None),
        }
    }

    /// Drop all state when the working graph is replaced; stale indices
    /// must never survive into the next graph.
    pub fn invalidate(&mut self, working: &WorkingGraph) {
        self.set_hover(working, None);
        self.select(working, None);
    }

    /// Hover readout (id + group), suppressed while a selection exists.
    pub fn tooltip<'a>(&self, working: &'a WorkingGraph) -> Option<(&'a str, &'a str)> {
        if self.selected.is_some() {
            return None;
        }
        self.hovered
            .and_then(|index| working.nodes.get(index))
            .map(|node| (node.id.as_str(), node.group.as_str()))
    }

    pub fn node_emphasis(&self, index: usize) -> Emphasis {
        if self.selected.is_none() || self.neighborhood.contains(&index) {
            Emphasis::Full
        } else {
            Emphasis::Dim
        }
    }

    pub fn edge_opacity(&self, edge: (usize, usize)) -> f32 {
        let Some(selected) = self.selected else {
            return EDGE_NEUTRAL_OPACITY;
        };
        if edge.0 == selected || edge.1 == selected {
            EDGE_EMPHASIS_OPACITY
        } else {
            DIM_OPACITY
        }
    }

    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CausalGraph, CausalNode, DisplayMode, GraphEdge};

    fn working(ids: &[&str], edges: &[(usize, usize)]) -> WorkingGraph {
        let graph = CausalGraph {
            nodes: ids
                .iter()
                .map(|id| CausalNode {
                    id: id.to_string(),
                    group: "g".to_string(),
                    is_core: false,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|&(source, target)| GraphEdge { source, target })
                .collect(),
        };
        WorkingGraph::project(&graph, DisplayMode::All)
    }

    fn emphasized(engine: &SelectionEngine, count: usize) -> Vec<usize> {
        (0..count)
            .filter(|&index| engine.node_emphasis(index) == Emphasis::Full)
            .collect()
    }

    #[test]
    fn selection_emphasizes_closed_neighborhood() {
        // A-B, A-C, B-D
        let graph = working(&["A", "B", "C", "D"], &[(0, 1), (0, 2), (1, 3)]);
        let mut engine = SelectionEngine::default();

        engine.click(&graph, Some(0));
        assert_eq!(emphasized(&engine, 4), vec![0, 1, 2]);

        engine.select(&graph, Some(3));
        assert_eq!(emphasized(&engine, 4), vec![1, 3]);
    }

    #[test]
    fn edge_opacity_tracks_incidence() {
        let graph = working(&["A", "B", "C"], &[(0, 1), (1, 2)]);
        let mut engine = SelectionEngine::default();
        assert_eq!(engine.edge_opacity((0, 1)), 0.6);

        engine.click(&graph, Some(0));
        assert_eq!(engine.edge_opacity((0, 1)), 0.9);
        assert_eq!(engine.edge_opacity((1, 2)), DIM_OPACITY);
    }

    #[test]
    fn clicking_selected_node_toggles_back_to_neutral() {
        let graph = working(&["A", "B"], &[(0, 1)]);
        let mut engine = SelectionEngine::default();
        engine.click(&graph, Some(0));
        assert_eq!(engine.selected(), Some(0));
        engine.click(&graph, Some(0));
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.node_emphasis(1), Emphasis::Full);
    }

    #[test]
    fn empty_canvas_click_clears_selection() {
        let graph = working(&["A"], &[]);
        let mut engine = SelectionEngine::default();
        engine.click(&graph, Some(0));
        engine.click(&graph, None);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn tooltip_shows_on_hover_and_yields_to_selection() {
        let graph = working(&["A", "B"], &[(0, 1)]);
        let mut engine = SelectionEngine::default();

        engine.set_hover(&graph, Some(1));
        assert_eq!(engine.tooltip(&graph), Some(("B", "g")));

        engine.click(&graph, Some(0));
        assert_eq!(engine.tooltip(&graph), None);

        engine.click(&graph, Some(0));
        assert_eq!(engine.tooltip(&graph), Some(("B", "g")));
    }

    #[test]
    fn events_report_id_transitions() {
        let graph = working(&["A", "B"], &[(0, 1)]);
        let mut engine = SelectionEngine::default();

        engine.set_hover(&graph, Some(0));
        engine.click(&graph, Some(1));
        engine.click(&graph, Some(1));

        assert_eq!(
            engine.drain_events(),
            vec![
                GraphEvent::HoverChanged(Some("A".to_string())),
                GraphEvent::SelectionChanged(Some("B".to_string())),
                GraphEvent::SelectionChanged(None),
            ]
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn invalidate_clears_everything() {
        let graph = working(&["A", "B"], &[(0, 1)]);
        let mut engine = SelectionEngine::default();
        engine.set_hover(&graph, Some(0));
        engine.click(&graph, Some(1));
        engine.drain_events();

        engine.invalidate(&graph);
        assert_eq!(engine.hovered(), None);
        assert_eq!(engine.selected(), None);
        assert_eq!(
            engine.drain_events(),
            vec![
                GraphEvent::HoverChanged(None),
                GraphEvent::SelectionChanged(None),
            ]
        );
    }
}
