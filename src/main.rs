use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use comm_viz::detect::{CommunityProvider, FixedStructure, KnownKarate, LabelPropagation};
use comm_viz::graph::{traverse_degree, Graph};
use comm_viz::logger::init_logger;
use comm_viz::render::RenderStyle;
use comm_viz::viz::{draw_circular, draw_comm_detection_res, try_different_layouts, VizOptions};

#[derive(Parser, Debug)]
#[command(name = "comm_viz", about = "Render the community structure of a social graph.")]
struct Args {
    /// Optional .graph input file; defaults to the built-in karate club.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for the per-layout gallery images.
    #[arg(long, default_value = "graph_layout")]
    layout_dir: PathBuf,

    /// Directory for the circular and partition renders.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for the randomized layouts.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional YAML file overriding the render style.
    #[arg(long)]
    style: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logger()?;
    let args = Args::parse();

    // Step 1. Obtain the graph and a community provider for it.
    let (graph, provider): (Graph, Box<dyn CommunityProvider>) = match &args.input {
        Some(input) => {
            let (graph, comm_structure) = Graph::from_graph_file(input)?;
            info!(
                "Loaded {}: {} vertices, {} edges",
                input.display(),
                graph.v_size(),
                graph.e_size()
            );
            if comm_structure.is_empty() {
                (graph, Box::new(LabelPropagation::default()))
            } else {
                (graph, Box::new(FixedStructure::new(comm_structure)))
            }
        }
        None => (Graph::karate_club(), Box::new(KnownKarate)),
    };
    traverse_degree(&graph);

    // Step 2. Assemble the render options.
    let mut opts = VizOptions {
        out_dir: args.out_dir,
        layout_dir: args.layout_dir,
        seed: args.seed,
        ..Default::default()
    };
    if let Some(style_path) = &args.style {
        opts.style = RenderStyle::from_yaml_file(style_path)?;
    }

    // Step 3. Render the gallery, the portrait and the partition overlay.
    try_different_layouts(&graph, &opts)?;
    draw_circular(&graph, &opts)?;
    draw_comm_detection_res(&graph, provider.as_ref(), &opts)?;
    info!("All renders complete");
    Ok(())
}
