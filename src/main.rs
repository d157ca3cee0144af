use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod data;
mod error;
mod graph;
mod cluster;
mod viz;

use config::Config;

#[derive(Parser, Debug)]
#[clap(
    name = "collab-network-analyzer",
    about = "Builds an interactive collaboration network from multi-author records"
)]
struct Cli {
    /// Path to input CSV file
    #[clap(long)]
    input: String,

    /// Output HTML file
    #[clap(long, default_value = "index.html")]
    output: PathBuf,

    /// Column holding the delimited participant list
    #[clap(long, default_value = "Inventors")]
    column: String,

    /// Delimiter between participants within a cell
    #[clap(long, default_value = ";")]
    delimiter: String,

    /// Number of highest-degree nodes to keep
    #[clap(long, default_value = "80")]
    top_n: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = Config::with_top_n(args.top_n);
    config.validate()?;

    log::info!("Starting collaboration network analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output.display());

    // 1. Load participant groups
    let records = data::load_records(&args.input, &args.column, &args.delimiter)?;

    // 2. Build the co-occurrence graph
    let full_graph = graph::build_graph(&records);

    log::info!(
        "Built graph with {} nodes and {} edges",
        full_graph.node_count,
        full_graph.edge_count()
    );

    // 3. Reduce to the most connected participants
    let graph = graph::filter::top_degree_subgraph(&full_graph, config.top_n)?;

    log::info!(
        "Kept top {} nodes with {} edges",
        graph.node_count,
        graph.edge_count()
    );

    // 4. Detect collaboration communities
    let partition = cluster::detect_communities(&graph, &config)?;

    let q = cluster::metrics::modularity(&graph, &partition);
    log::info!(
        "Found {} communities (modularity {:.4})",
        partition.community_count(),
        q
    );

    for summary in cluster::summarize(&graph, &partition).iter().take(10) {
        log::debug!("Community {}: {} members", summary.id, summary.size);
    }

    // 5. Assemble and write the visualization
    let (nodes, edges) = viz::assemble(&graph, &partition);
    viz::generate_visualization(&nodes, &edges, &args.output)?;

    log::info!("Analysis complete. Visualization saved to {}", args.output.display());

    Ok(())
}
