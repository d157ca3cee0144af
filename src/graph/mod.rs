//! Graph representation and construction module

pub mod builder;
pub mod filter;

pub use builder::{GraphBuilder, build_graph};

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Weighted undirected graph of collaborations.
///
/// Nodes are identified by label; internally they are indexed in first-seen
/// insertion order, with a side table mapping indices back to labels. Every
/// edge appears in both endpoints' adjacency lists with the same weight, and
/// no self-loops exist. The graph is mutated only during construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollabGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Mapping from labels to node indices
    id_to_index: HashMap<String, u32>,

    /// Node labels, indexed by node index
    pub node_ids: Vec<String>,

    /// Adjacency lists: (neighbor index, edge weight) per node
    adjacency: Vec<Vec<(u32, u32)>>,
}

impl CollabGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::new(),
            node_ids: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    /// Get or create the node index for the given label
    pub(crate) fn get_or_create_node(&mut self, label: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(label) {
            return idx;
        }

        let idx = self.node_count as u32;
        self.id_to_index.insert(label.to_string(), idx);
        self.node_ids.push(label.to_string());
        self.adjacency.push(Vec::new());
        self.node_count += 1;

        idx
    }

    /// Add weight to the undirected edge between two nodes, creating it
    /// with that weight if absent. Self-loops are ignored.
    pub(crate) fn add_edge_weight(&mut self, u: u32, v: u32, weight: u32) {
        if u == v {
            return;
        }
        Self::bump(&mut self.adjacency[u as usize], v, weight);
        Self::bump(&mut self.adjacency[v as usize], u, weight);
    }

    fn bump(list: &mut Vec<(u32, u32)>, target: u32, weight: u32) {
        if let Some(entry) = list.iter_mut().find(|(n, _)| *n == target) {
            entry.1 += weight;
        } else {
            list.push((target, weight));
        }
    }

    /// Sort all adjacency lists by neighbor index so edge iteration is
    /// independent of insertion order
    pub(crate) fn sort_adjacency_lists(&mut self) {
        for list in &mut self.adjacency {
            list.sort_unstable_by_key(|&(n, _)| n);
        }
    }

    /// Look up the node index for a label
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.id_to_index.get(label).copied()
    }

    /// Get the label of a node
    pub fn label(&self, node: u32) -> &str {
        &self.node_ids[node as usize]
    }

    /// Get the neighbors of a node with their edge weights
    pub fn neighbors(&self, node: u32) -> &[(u32, u32)] {
        &self.adjacency[node as usize]
    }

    /// Get the weight of the edge between two nodes, if present
    pub fn edge_weight(&self, u: u32, v: u32) -> Option<u32> {
        self.adjacency[u as usize]
            .iter()
            .find(|&&(n, _)| n == v)
            .map(|&(_, w)| w)
    }

    /// Unweighted degree: number of incident edges.
    ///
    /// This is the convention used for top-N filtering and for the node size
    /// reported in the output; the Louvain internals use weighted degree.
    pub fn degree(&self, node: u32) -> usize {
        self.adjacency[node as usize].len()
    }

    /// Weighted degree: sum of incident edge weights
    pub fn weighted_degree(&self, node: u32) -> u64 {
        self.adjacency[node as usize]
            .iter()
            .map(|&(_, w)| w as u64)
            .sum()
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|list| list.len()).sum::<usize>() / 2
    }

    /// Total weight over all undirected edges
    pub fn total_weight(&self) -> u64 {
        self.adjacency
            .iter()
            .flat_map(|list| list.iter())
            .map(|&(_, w)| w as u64)
            .sum::<u64>()
            / 2
    }

    /// Iterate over undirected edges as (u, v, weight) with u < v, in
    /// ascending index order
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        (0..self.node_count as u32).flat_map(move |u| {
            self.adjacency[u as usize]
                .iter()
                .filter(move |&&(v, _)| u < v)
                .map(move |&(v, w)| (u, v, w))
        })
    }
}

impl Default for CollabGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CollabGraph {
        build_graph(&[vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
        ]])
    }

    #[test]
    fn edge_weights_are_symmetric() {
        let g = triangle();
        for (u, v, w) in g.edges() {
            assert_eq!(g.edge_weight(u, v), Some(w));
            assert_eq!(g.edge_weight(v, u), Some(w));
        }
    }

    #[test]
    fn no_self_loops() {
        let g = triangle();
        for u in 0..g.node_count as u32 {
            assert!(g.neighbors(u).iter().all(|&(v, _)| v != u));
        }
    }

    #[test]
    fn degree_counts_edges_not_weight() {
        let g = build_graph(&[
            vec!["A".to_string(), "B".to_string()],
            vec!["A".to_string(), "B".to_string()],
        ]);
        let a = g.index_of("A").unwrap();
        assert_eq!(g.degree(a), 1);
        assert_eq!(g.weighted_degree(a), 2);
    }
}
