//! Louvain community detection
//!
//! Greedy modularity optimization alternating a local-moving phase with
//! graph aggregation, after Blondel et al. Nodes are visited in a fixed
//! ascending-index order and candidate communities in ascending-id order,
//! so the result is fully deterministic for a given input graph.

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use log;
use crate::cluster::Partition;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::graph::CollabGraph;

/// One level of the aggregation hierarchy.
///
/// Community super-nodes carry their internal weight as a self-loop so
/// modularity accounting stays correct on subsequent levels. Self-loops
/// count twice toward a node's weighted degree.
struct LevelGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,

    /// 2m: sum of weighted degrees, invariant under aggregation
    two_m: f64,
}

impl LevelGraph {
    fn from_collab(graph: &CollabGraph) -> Self {
        let n = graph.node_count;
        let mut adjacency = vec![Vec::new(); n];
        for (u, v, w) in graph.edges() {
            adjacency[u as usize].push((v as usize, w as f64));
            adjacency[v as usize].push((u as usize, w as f64));
        }

        let mut level = Self {
            adjacency,
            self_loops: vec![0.0; n],
            two_m: 0.0,
        };
        level.two_m = level.degrees().iter().sum();
        level
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Weighted degree per node
    fn degrees(&self) -> Vec<f64> {
        (0..self.node_count())
            .map(|i| {
                self.adjacency[i].iter().map(|&(_, w)| w).sum::<f64>()
                    + 2.0 * self.self_loops[i]
            })
            .collect()
    }

    /// Contract communities into super-nodes. `community` must hold
    /// contiguous ids in 0..community_count.
    fn aggregate(&self, community: &[usize], community_count: usize) -> Self {
        let mut self_loops = vec![0.0; community_count];
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); community_count];

        for node in 0..self.node_count() {
            let cu = community[node];
            self_loops[cu] += self.self_loops[node];

            for &(nbr, w) in &self.adjacency[node] {
                let cv = community[nbr];
                if cu == cv {
                    // each intra edge visited from both ends; count once
                    if node < nbr {
                        self_loops[cu] += w;
                    }
                } else {
                    *weights[cu].entry(cv).or_insert(0.0) += w;
                }
            }
        }

        Self {
            adjacency: weights
                .into_iter()
                .map(|m| m.into_iter().collect())
                .collect(),
            self_loops,
            two_m: self.two_m,
        }
    }
}

/// One full pass over all nodes in fixed ascending order, moving each to
/// the neighboring community with the strictly greatest positive modularity
/// gain. Returns the number of nodes moved.
fn sweep(
    graph: &LevelGraph,
    degrees: &[f64],
    community: &mut [usize],
    sum_tot: &mut [f64],
    gain_tolerance: f64,
) -> usize {
    let two_m = graph.two_m;
    let mut moves = 0;

    for node in 0..graph.node_count() {
        let k_i = degrees[node];
        let current = community[node];

        // weight from this node to each adjacent community; BTreeMap
        // keeps candidate iteration in ascending-id order
        let mut links: BTreeMap<usize, f64> = BTreeMap::new();
        links.insert(current, 0.0);
        for &(nbr, w) in &graph.adjacency[node] {
            *links.entry(community[nbr]).or_insert(0.0) += w;
        }

        // take the node out before evaluating candidates
        sum_tot[current] -= k_i;

        let mut best = current;
        let mut best_gain = links[&current] - sum_tot[current] * k_i / two_m;
        for (&candidate, &w_to) in &links {
            let gain = w_to - sum_tot[candidate] * k_i / two_m;
            if gain > best_gain + gain_tolerance {
                best = candidate;
                best_gain = gain;
            }
        }

        sum_tot[best] += k_i;
        if best != current {
            community[node] = best;
            moves += 1;
        }
    }

    moves
}

/// Local-moving phase: repeatedly sweep all nodes until a full sweep
/// produces no move.
fn local_moving(graph: &LevelGraph, config: &Config) -> Result<(Vec<usize>, bool)> {
    let n = graph.node_count();
    let degrees = graph.degrees();

    let mut community: Vec<usize> = (0..n).collect();
    let mut sum_tot = degrees.clone();
    let mut improved = false;
    let mut sweeps = 0;

    loop {
        if sweeps >= config.max_sweeps {
            return Err(AnalysisError::ConvergenceFailure(config.max_sweeps).into());
        }
        sweeps += 1;

        let moves = sweep(
            graph,
            &degrees,
            &mut community,
            &mut sum_tot,
            config.gain_tolerance,
        );
        if moves == 0 {
            break;
        }
        improved = true;
    }

    Ok((community, improved))
}

/// Renumber arbitrary community ids to contiguous 0.., in order of first
/// appearance
fn renumber(assignments: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut next = 0;

    let renumbered = assignments
        .iter()
        .map(|&c| {
            *mapping.entry(c).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect();

    (renumbered, next)
}

/// Detect communities by modularity optimization.
///
/// Returns a partition assigning every node of `graph` exactly one community
/// id. A graph with no nodes yields an empty partition; a graph with no
/// edges yields singleton communities. Iteration bounds from `config` guard
/// against non-termination and surface as `ConvergenceFailure`.
pub fn detect_communities(graph: &CollabGraph, config: &Config) -> Result<Partition> {
    if graph.node_count == 0 {
        return Ok(Partition {
            assignments: Vec::new(),
        });
    }

    let mut membership: Vec<usize> = (0..graph.node_count).collect();
    let mut level = LevelGraph::from_collab(graph);

    if level.two_m == 0.0 {
        // all nodes isolated: every node its own community
        return Ok(Partition {
            assignments: membership,
        });
    }

    let mut levels = 0;
    loop {
        if levels >= config.max_levels {
            return Err(AnalysisError::ConvergenceFailure(config.max_levels).into());
        }
        levels += 1;

        let (community, improved) = local_moving(&level, config)?;
        let (community, count) = renumber(&community);

        for m in membership.iter_mut() {
            *m = community[*m];
        }

        log::debug!(
            "Louvain level {}: {} nodes -> {} communities",
            levels,
            level.node_count(),
            count
        );

        // converged once a level neither moves a node nor shrinks the graph
        if !improved || count == level.node_count() {
            break;
        }

        level = level.aggregate(&community, count);
    }

    let (assignments, count) = renumber(&membership);
    log::info!(
        "Detected {} communities over {} nodes in {} levels",
        count,
        graph.node_count,
        levels
    );

    Ok(Partition { assignments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::metrics::modularity;
    use crate::graph::{build_graph, CollabGraph, GraphBuilder};
    use std::collections::HashSet;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn isolated_nodes(labels: &[&str]) -> CollabGraph {
        let mut graph = CollabGraph::new();
        for label in labels {
            graph.get_or_create_node(label);
        }
        graph
    }

    #[test]
    fn empty_graph_yields_empty_partition() {
        let g = build_graph::<String>(&[]);
        let p = detect_communities(&g, &Config::default()).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn single_node_is_one_community() {
        let g = isolated_nodes(&["A"]);
        let p = detect_communities(&g, &Config::default()).unwrap();
        assert_eq!(p.assignments, vec![0]);
        assert_eq!(modularity(&g, &p), 0.0);
    }

    #[test]
    fn edgeless_graph_yields_singletons() {
        let g = isolated_nodes(&["A", "B", "C"]);
        let p = detect_communities(&g, &Config::default()).unwrap();
        assert_eq!(p.assignments, vec![0, 1, 2]);
    }

    #[test]
    fn every_node_gets_exactly_one_community() {
        let g = build_graph(&groups(&[
            &["A", "B", "C"],
            &["C", "D"],
            &["D", "E", "F"],
            &["F", "A"],
        ]));
        let p = detect_communities(&g, &Config::default()).unwrap();
        assert_eq!(p.len(), g.node_count);
    }

    #[test]
    fn disjoint_triangles_form_two_communities() {
        let g = build_graph(&groups(&[&["A", "B", "C"], &["D", "E", "F"]]));
        let p = detect_communities(&g, &Config::default()).unwrap();

        assert_eq!(p.community_count(), 2);

        let first: HashSet<&str> = p.communities()[0]
            .iter()
            .map(|&n| g.label(n))
            .collect();
        let second: HashSet<&str> = p.communities()[1]
            .iter()
            .map(|&n| g.label(n))
            .collect();
        assert_eq!(first, HashSet::from(["A", "B", "C"]));
        assert_eq!(second, HashSet::from(["D", "E", "F"]));

        assert!(modularity(&g, &p) > 0.0);
    }

    #[test]
    fn modularity_never_decreases_between_sweeps() {
        let g = build_graph(&groups(&[
            &["A", "B", "C", "D"],
            &["A", "B"],
            &["E", "F", "G", "H"],
            &["E", "F"],
            &["D", "E"],
            &["H", "A"],
        ]));
        let level = LevelGraph::from_collab(&g);
        let degrees = level.degrees();
        let mut community: Vec<usize> = (0..level.node_count()).collect();
        let mut sum_tot = degrees.clone();

        let mut prev_q = modularity(&g, &Partition::singletons(g.node_count));
        loop {
            let moves = sweep(
                &level,
                &degrees,
                &mut community,
                &mut sum_tot,
                Config::default().gain_tolerance,
            );
            let (assignments, _) = renumber(&community);
            let q = modularity(&g, &Partition { assignments });
            assert!(
                q >= prev_q - 1e-12,
                "modularity dropped between sweeps: {} -> {}",
                prev_q,
                q
            );
            prev_q = q;
            if moves == 0 {
                break;
            }
        }
    }

    #[test]
    fn detection_never_loses_to_singletons() {
        let g = build_graph(&groups(&[
            &["A", "B", "C"],
            &["A", "B"],
            &["D", "E", "F"],
            &["D", "E"],
            &["C", "D"],
        ]));
        let p = detect_communities(&g, &Config::default()).unwrap();
        let q = modularity(&g, &p);
        let q0 = modularity(&g, &Partition::singletons(g.node_count));
        assert!(q >= q0);
    }

    #[test]
    fn detection_is_deterministic() {
        let input = groups(&[
            &["A", "B", "C"],
            &["C", "D", "E"],
            &["E", "F"],
            &["F", "A"],
            &["B", "D"],
        ]);
        let g = build_graph(&input);
        let p1 = detect_communities(&g, &Config::default()).unwrap();
        let p2 = detect_communities(&g, &Config::default()).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn redetection_on_contracted_graph_does_not_split() {
        let g = build_graph(&groups(&[
            &["A", "B", "C"],
            &["D", "E", "F"],
            &["C", "D"],
        ]));
        let p = detect_communities(&g, &Config::default()).unwrap();

        // contract each community to one label and re-detect
        let mut builder = GraphBuilder::new();
        for (u, v, _) in g.edges() {
            let cu = p.community_of(u).to_string();
            let cv = p.community_of(v).to_string();
            if cu != cv {
                builder.add_group(&[cu, cv]);
            }
        }
        let contracted = builder.build();
        if contracted.node_count > 0 {
            let p2 = detect_communities(&contracted, &Config::default()).unwrap();
            assert!(p2.community_count() <= p.community_count());
        }
    }

    #[test]
    fn tight_sweep_bound_reports_convergence_failure() {
        let g = build_graph(&groups(&[&["A", "B", "C"], &["D", "E", "F"]]));
        let config = Config {
            max_sweeps: 1,
            ..Config::default()
        };
        // a single sweep cannot reach a local optimum here
        let err = detect_communities(&g, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::ConvergenceFailure(_))
        ));
    }
}
