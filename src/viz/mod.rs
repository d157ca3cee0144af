//! Renderable output assembly and HTML generation

use anyhow::Result;
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::cluster::Partition;
use crate::graph::CollabGraph;

/// One node of the rendered network, shaped for vis-network's DataSet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// Node label, doubling as the unique id
    pub id: String,

    /// Display label
    pub label: String,

    /// Node size driver: number of collaborators
    pub value: usize,

    /// Hover annotation
    pub title: String,

    /// Community id
    pub group: usize,

    /// Community color as an hsl() string
    pub color: String,
}

/// One edge of the rendered network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    /// Source node label
    pub from: String,

    /// Target node label
    pub to: String,

    /// Edge thickness driver: number of shared records
    pub value: u32,

    /// Weight shown along the edge
    pub label: String,

    /// Hover annotation
    pub title: String,
}

/// Deterministic color for a community id, spread around the hue wheel
pub fn community_color(group: usize) -> String {
    format!("hsl({},70%,50%)", (group * 40) % 360)
}

/// Flatten a graph and its partition into renderable node and edge lists.
///
/// Pure transformation. Nodes come out in graph insertion order and edges in
/// ascending endpoint-index order, so repeated runs on identical input
/// serialize byte-identically.
pub fn assemble(graph: &CollabGraph, partition: &Partition) -> (Vec<NodeView>, Vec<EdgeView>) {
    let nodes = (0..graph.node_count as u32)
        .map(|n| {
            let label = graph.label(n).to_string();
            let degree = graph.degree(n);
            let group = partition.community_of(n);
            NodeView {
                title: format!("{}<br>Connections: {}", label, degree),
                id: label.clone(),
                label,
                value: degree,
                group,
                color: community_color(group),
            }
        })
        .collect();

    let edges = graph
        .edges()
        .map(|(u, v, w)| {
            let from = graph.label(u).to_string();
            let to = graph.label(v).to_string();
            EdgeView {
                title: format!("Collaboration between {} and {}<br>Records: {}", from, to, w),
                label: w.to_string(),
                from,
                to,
                value: w,
            }
        })
        .collect();

    (nodes, edges)
}

const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <title>Collaboration Network</title>
  <link href="https://unpkg.com/vis-network@9.1.2/dist/vis-network.min.css" rel="stylesheet" />
  <script src="https://unpkg.com/vis-network@9.1.2/dist/vis-network.min.js"></script>
  <style>
    html, body { margin:0; padding:0; height:100%; width:100%; overflow:hidden; }
    #network { width:100%; height:100%; position:relative; z-index:1; }
    #explanation {
      position:absolute; top:10px; left:10px; z-index:2;
      background: rgba(255,255,255,0.8); padding:10px;
      border-radius:5px; max-width:300px;
      font-family:Arial, sans-serif; font-size:14px;
    }
  </style>
</head>
<body>
  <div id="explanation">
    <strong>Collaboration Network</strong><br>
    Each node is a participant (size &#8733; number of collaborators).<br>
    Node color = collaboration community.<br>
    Edge thickness &#8733; number of shared records.<br>
    Hover on a node to see its connection count.<br>
    Hover on an edge to see the exact record count.
  </div>
  <div id="network"></div>
  <script>
    var nodes = new vis.DataSet(NODES_JSON_PLACEHOLDER);
    var edges = new vis.DataSet(EDGES_JSON_PLACEHOLDER);

    var container = document.getElementById("network");
    var data = { nodes: nodes, edges: edges };
    var options = {
      physics: {
        barnesHut: {
          gravitationalConstant: -5000,
          centralGravity: 0.3,
          springLength: 250,
          damping: 0.95
        }
      },
      interaction: { hover: true, tooltipDelay: 100 }
    };
    var network = new vis.Network(container, data, options);
  </script>
</body>
</html>
"##;

/// Render the node and edge lists into a self-contained HTML page
pub fn render_html(nodes: &[NodeView], edges: &[EdgeView]) -> Result<String> {
    let html = HTML_TEMPLATE
        .replace("NODES_JSON_PLACEHOLDER", &serde_json::to_string_pretty(nodes)?)
        .replace("EDGES_JSON_PLACEHOLDER", &serde_json::to_string_pretty(edges)?);
    Ok(html)
}

/// Write the interactive visualization to a file
pub fn generate_visualization(
    nodes: &[NodeView],
    edges: &[EdgeView],
    output_path: &Path,
) -> Result<()> {
    log::info!(
        "Writing visualization with {} nodes and {} edges to {}",
        nodes.len(),
        edges.len(),
        output_path.display()
    );

    let mut file = File::create(output_path)?;
    file.write_all(render_html(nodes, edges)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detect_communities;
    use crate::config::Config;
    use crate::graph::build_graph;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn views_carry_degree_community_and_annotations() {
        let g = build_graph(&groups(&[&["A", "B"], &["A", "B"], &["A", "C"]]));
        let p = Partition {
            assignments: vec![0, 0, 0],
        };
        let (nodes, edges) = assemble(&g, &p);

        assert_eq!(nodes.len(), 3);
        let a = &nodes[0];
        assert_eq!(a.id, "A");
        assert_eq!(a.value, 2);
        assert_eq!(a.group, 0);
        assert_eq!(a.color, "hsl(0,70%,50%)");
        assert_eq!(a.title, "A<br>Connections: 2");

        assert_eq!(edges.len(), 2);
        let ab = &edges[0];
        assert_eq!((ab.from.as_str(), ab.to.as_str()), ("A", "B"));
        assert_eq!(ab.value, 2);
        assert_eq!(ab.label, "2");
        assert_eq!(ab.title, "Collaboration between A and B<br>Records: 2");
    }

    #[test]
    fn colors_wrap_around_the_hue_wheel() {
        assert_eq!(community_color(1), "hsl(40,70%,50%)");
        assert_eq!(community_color(9), "hsl(0,70%,50%)");
    }

    #[test]
    fn pipeline_output_is_byte_identical_across_runs() {
        let input = groups(&[&["A", "B", "C"], &["D", "E", "F"], &["C", "D"]]);
        let mut serialized = Vec::new();
        for _ in 0..2 {
            let g = build_graph(&input);
            let p = detect_communities(&g, &Config::default()).unwrap();
            let (nodes, edges) = assemble(&g, &p);
            serialized.push(render_html(&nodes, &edges).unwrap());
        }
        assert_eq!(serialized[0], serialized[1]);
    }

    #[test]
    fn html_embeds_both_datasets() {
        let g = build_graph(&groups(&[&["A", "B"]]));
        let p = Partition {
            assignments: vec![0, 0],
        };
        let (nodes, edges) = assemble(&g, &p);
        let html = render_html(&nodes, &edges).unwrap();
        assert!(!html.contains("NODES_JSON_PLACEHOLDER"));
        assert!(!html.contains("EDGES_JSON_PLACEHOLDER"));
        assert!(html.contains("\"id\": \"A\""));
        assert!(html.contains("vis.Network"));
    }
}
