//! Partition quality metrics

use crate::cluster::Partition;
use crate::graph::CollabGraph;

/// Network modularity Q of a partition.
///
/// Q = (1 / 2m) * sum_ij [A_ij - k_i * k_j / 2m] * delta(c_i, c_j), with m
/// the total edge weight and k the weighted degree. Zero-weight graphs have
/// Q = 0 by convention.
pub fn modularity(graph: &CollabGraph, partition: &Partition) -> f64 {
    let m = graph.total_weight() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let community_count = partition.community_count();
    let mut intra_weight = vec![0.0f64; community_count];
    let mut degree_sum = vec![0.0f64; community_count];

    for (u, v, w) in graph.edges() {
        if partition.community_of(u) == partition.community_of(v) {
            intra_weight[partition.community_of(u)] += w as f64;
        }
    }

    for node in 0..graph.node_count as u32 {
        degree_sum[partition.community_of(node)] += graph.weighted_degree(node) as f64;
    }

    (0..community_count)
        .map(|c| {
            let fraction = degree_sum[c] / (2.0 * m);
            intra_weight[c] / m - fraction * fraction
        })
        .sum()
}
