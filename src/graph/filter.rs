//! Degree-based graph reduction

use anyhow::Result;
use crate::error::AnalysisError;
use crate::graph::CollabGraph;
use log;

/// Keep the subgraph induced by the k highest-degree nodes.
///
/// Degree is the incident edge count. Ties at the cutoff are broken by label,
/// ascending, so the selection is reproducible. If the graph has fewer than k
/// nodes the full graph is returned. Selected nodes keep their relative
/// insertion order; edges are kept only when both endpoints are selected,
/// with weights unchanged. Isolated nodes among the selected set remain.
pub fn top_degree_subgraph(graph: &CollabGraph, k: usize) -> Result<CollabGraph> {
    if k == 0 {
        return Err(AnalysisError::InvalidConfiguration(
            "top-N cutoff must be positive".to_string(),
        )
        .into());
    }

    if graph.node_count <= k {
        return Ok(graph.clone());
    }

    // Rank nodes: degree descending, label ascending at ties
    let mut ranked: Vec<u32> = (0..graph.node_count as u32).collect();
    ranked.sort_by(|&a, &b| {
        graph
            .degree(b)
            .cmp(&graph.degree(a))
            .then_with(|| graph.label(a).cmp(graph.label(b)))
    });

    let mut keep = vec![false; graph.node_count];
    for &node in ranked.iter().take(k) {
        keep[node as usize] = true;
    }

    // Rebuild in original insertion order so output ordering is stable
    let mut orig_to_new = vec![u32::MAX; graph.node_count];
    let mut filtered = CollabGraph::new();
    for node in 0..graph.node_count as u32 {
        if keep[node as usize] {
            orig_to_new[node as usize] = filtered.get_or_create_node(graph.label(node));
        }
    }

    for (u, v, w) in graph.edges() {
        if keep[u as usize] && keep[v as usize] {
            filtered.add_edge_weight(orig_to_new[u as usize], orig_to_new[v as usize], w);
        }
    }

    filtered.sort_adjacency_lists();

    log::debug!(
        "Degree filter kept {} of {} nodes, {} of {} edges",
        filtered.node_count,
        graph.node_count,
        filtered.edge_count(),
        graph.edge_count()
    );

    Ok(filtered)
}
