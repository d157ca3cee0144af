//! Graph construction from grouped co-occurrence lists

use itertools::Itertools;
use crate::graph::CollabGraph;

/// Builder for incrementally constructing a CollabGraph from groups of
/// co-occurring labels
pub struct GraphBuilder {
    graph: CollabGraph,
}

impl GraphBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self {
            graph: CollabGraph::new(),
        }
    }

    /// Add one group of labels.
    ///
    /// Every unordered pair of distinct labels in the group adds weight 1 to
    /// the corresponding edge. Labels are trimmed and blank entries dropped
    /// before pairing; groups with fewer than two usable labels contribute
    /// no edges.
    pub fn add_group<S: AsRef<str>>(&mut self, members: &[S]) {
        let members: Vec<&str> = members
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();

        if members.len() < 2 {
            return;
        }

        for (&a, &b) in members.iter().tuple_combinations() {
            let u = self.graph.get_or_create_node(a);
            let v = self.graph.get_or_create_node(b);
            // u == v when a label repeats within a group; never a self-loop
            self.graph.add_edge_weight(u, v, 1);
        }
    }

    /// Finish construction
    pub fn build(mut self) -> CollabGraph {
        self.graph.sort_adjacency_lists();
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a collaboration graph from a sequence of groups.
///
/// Deterministic: the same groups in the same order always produce the same
/// graph, with node indices in first-seen order.
pub fn build_graph<S: AsRef<str>>(groups: &[Vec<S>]) -> CollabGraph {
    let mut builder = GraphBuilder::new();
    for group in groups {
        builder.add_group(group);
    }
    builder.build()
}
