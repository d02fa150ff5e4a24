use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::WorkingGraph;

/// Locate a variable by case-insensitive substring match over the
/// current working set, in iteration order. First match wins; this is a
/// navigation box, not a ranked query, so determinism beats cleverness.
/// Empty or whitespace-only terms are a no-op.
pub fn find_in_working(working: &WorkingGraph, term: &str) -> Option<usize> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let needle = term.to_lowercase();
    working
        .nodes
        .iter()
        .position(|node| node.id.to_lowercase().contains(&needle))
}

/// Soft highlight while typing: every node whose id fuzzy-matches the
/// query. Advisory tinting only; never drives selection or navigation.
pub fn pseudo_matches(working: &WorkingGraph, query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }
    let matcher = SkimMatcherV2::default();
    working
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            matcher
                .fuzzy_match(&node.id, query)
                .or_else(|| {
                    matcher.fuzzy_match(&node.id.to_ascii_lowercase(), &query.to_ascii_lowercase())
                })
                .map(|_| index)
        })
        .collect()
}
