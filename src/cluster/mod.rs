//! Community detection module

pub mod louvain;
pub mod metrics;

pub use louvain::detect_communities;

use serde::{Serialize, Deserialize};
use crate::graph::CollabGraph;

/// Community assignments for every node of a graph.
///
/// Indexed by node index; frozen once detection converges. Community ids are
/// contiguous from 0, numbered in order of first appearance over the node
/// insertion order, so identical inputs produce identical ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Community id per node index
    pub assignments: Vec<usize>,
}

impl Partition {
    /// Partition with every node in its own community
    pub fn singletons(node_count: usize) -> Self {
        Self {
            assignments: (0..node_count).collect(),
        }
    }

    /// Community id of a node
    pub fn community_of(&self, node: u32) -> usize {
        self.assignments[node as usize]
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True when no nodes are covered
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of distinct communities
    pub fn community_count(&self) -> usize {
        self.assignments.iter().max().map_or(0, |&max| max + 1)
    }

    /// Members of each community, indexed by community id
    pub fn communities(&self) -> Vec<Vec<u32>> {
        let mut members = vec![Vec::new(); self.community_count()];
        for (node, &c) in self.assignments.iter().enumerate() {
            members[c].push(node as u32);
        }
        members
    }
}

/// Summary of one detected community, for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySummary {
    /// Community id
    pub id: usize,

    /// Number of members
    pub size: usize,

    /// Member labels
    pub members: Vec<String>,
}

/// Summarize a partition over a graph, largest communities first
pub fn summarize(graph: &CollabGraph, partition: &Partition) -> Vec<CommunitySummary> {
    let mut summaries: Vec<CommunitySummary> = partition
        .communities()
        .into_iter()
        .enumerate()
        .map(|(id, nodes)| CommunitySummary {
            id,
            size: nodes.len(),
            members: nodes.iter().map(|&n| graph.label(n).to_string()).collect(),
        })
        .collect();
    summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_partition_covers_all_nodes() {
        let p = Partition::singletons(4);
        assert_eq!(p.len(), 4);
        assert_eq!(p.community_count(), 4);
        assert_eq!(p.communities(), vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn community_count_tracks_max_id() {
        let p = Partition {
            assignments: vec![0, 1, 0, 1, 1],
        };
        assert_eq!(p.community_count(), 2);
        assert_eq!(p.communities()[1], vec![1, 3, 4]);
    }
}
