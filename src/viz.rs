// Orchestration of the karate-club renders: the layout gallery, the
// red circular portrait, and the community-partition overlay.
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::classify::classify_edges;
use crate::detect::CommunityProvider;
use crate::graph::Graph;
use crate::layout::{compute_layout, LayoutKind};
use crate::render::{Canvas, Color, Palette, RenderStyle};

pub struct VizOptions {
    pub out_dir: PathBuf,
    pub layout_dir: PathBuf,
    pub seed: u64,
    pub style: RenderStyle,
    pub palette: Palette,
}

impl Default for VizOptions {
    fn default() -> VizOptions {
        VizOptions {
            out_dir: PathBuf::from("."),
            layout_dir: PathBuf::from("graph_layout"),
            seed: 42,
            style: RenderStyle::default(),
            palette: Palette::default(),
        }
    }
}

/// The gallery of layout variants rendered by the original study, one
/// image per algorithm. `networkx.png` is the package's default spring
/// layout and `graphviz.png` its force-directed one.
static LAYOUT_GALLERY: [(LayoutKind, &str); 7] = [
    (LayoutKind::Random, "rand.png"),
    (LayoutKind::Circular, "circular.png"),
    (LayoutKind::Spectral, "spectral.png"),
    (LayoutKind::Spring, "networkx.png"),
    (LayoutKind::ForceDirected, "graphviz.png"),
    (LayoutKind::Shell, "shell.png"),
    (LayoutKind::Spring, "spring.png"),
];

/// Render the same graph under every canned layout into the layout
/// directory: grey edges, default-blue nodes, labels on.
pub fn try_different_layouts(graph: &Graph, opts: &VizOptions) -> Result<()> {
    let all_vertices: Vec<_> = graph.vertices().collect();
    for (kind, file_name) in LAYOUT_GALLERY {
        let positions = compute_layout(graph, kind, opts.seed);
        let mut canvas = Canvas::new(positions, opts.style.clone());
        canvas.draw_edges(&graph.edges(), Color::GREY, opts.style.edge_width, opts.style.node_alpha);
        canvas.draw_nodes(&all_vertices, Color::BLUE, opts.style.node_alpha);
        canvas.draw_labels(Color::BLACK);
        let target = opts.layout_dir.join(file_name);
        canvas
            .export(&target)
            .with_context(|| format!("rendering {} layout", kind.name()))?;
        info!("Rendered {} layout to {}", kind.name(), target.display());
    }
    Ok(())
}

/// The red circular portrait, exported as both raster and vector.
pub fn draw_circular(graph: &Graph, opts: &VizOptions) -> Result<()> {
    let positions = compute_layout(graph, LayoutKind::Circular, opts.seed);
    let all_vertices: Vec<_> = graph.vertices().collect();
    let mut canvas = Canvas::new(positions, opts.style.clone());
    canvas.draw_edges(&graph.edges(), Color::GREY, opts.style.edge_width, opts.style.node_alpha);
    canvas.draw_nodes(&all_vertices, Color::RED, opts.style.node_alpha);
    canvas.draw_labels(Color::BLACK);
    for file_name in ["karate_circular.png", "karate_circular.svg"] {
        canvas.export(&opts.out_dir.join(file_name))?;
    }
    info!("Rendered circular portrait to {}", opts.out_dir.display());
    Ok(())
}

/// Overlay a community partition on a force-directed drawing: colored
/// node groups, grey base edges, and wide intra-community edge
/// highlights from the classifier.
pub fn draw_comm_detection_res(
    graph: &Graph,
    provider: &dyn CommunityProvider,
    opts: &VizOptions,
) -> Result<()> {
    let positions = compute_layout(graph, LayoutKind::ForceDirected, opts.seed);
    let (comm_dict, partition) = provider.detect(graph)?;
    let mut canvas = Canvas::new(positions, opts.style.clone());

    // Base edges in grey, under the community highlights.
    let edges = graph.edges();
    canvas.draw_edges(&edges, Color::GREY, opts.style.edge_width, opts.style.edge_alpha);

    let edge_groups = classify_edges(&edges, &partition)?;
    for (comm_id, group) in &edge_groups {
        let color = opts.palette.color_for(*comm_id)?;
        debug!("Community {}: {} intra-community edges", comm_id, group.len());
        canvas.draw_edges(group, color, opts.style.highlight_width, opts.style.edge_alpha);
    }
    for (comm_id, members) in &comm_dict {
        let color = opts.palette.color_for(*comm_id)?;
        canvas.draw_nodes(members, color, opts.style.node_alpha);
    }
    canvas.draw_labels(Color::BLACK);
    for file_name in ["karate_partition.png", "karate_partition.svg"] {
        canvas.export(&opts.out_dir.join(file_name))?;
    }
    info!(
        "Rendered {} communities to {}",
        comm_dict.len(),
        opts.out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod test_viz {
    use crate::detect::KnownKarate;
    use crate::graph::Graph;
    use crate::render::Palette;
    use crate::viz::{draw_circular, draw_comm_detection_res, try_different_layouts, VizOptions};

    fn temp_options(dir: &tempfile::TempDir) -> VizOptions {
        VizOptions {
            out_dir: dir.path().to_path_buf(),
            layout_dir: dir.path().join("graph_layout"),
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_gallery_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let opts = temp_options(&dir);
        let graph = Graph::karate_club();
        try_different_layouts(&graph, &opts).unwrap();
        for file_name in [
            "rand.png",
            "circular.png",
            "spectral.png",
            "networkx.png",
            "graphviz.png",
            "shell.png",
            "spring.png",
        ] {
            assert!(opts.layout_dir.join(file_name).exists(), "{} missing", file_name);
        }
    }

    #[test]
    fn test_partition_overlay_writes_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let opts = temp_options(&dir);
        let graph = Graph::karate_club();
        draw_comm_detection_res(&graph, &KnownKarate, &opts).unwrap();
        assert!(opts.out_dir.join("karate_partition.png").exists());
        assert!(opts.out_dir.join("karate_partition.svg").exists());
    }

    #[test]
    fn test_circular_portrait() {
        let dir = tempfile::tempdir().unwrap();
        let opts = temp_options(&dir);
        let graph = Graph::karate_club();
        draw_circular(&graph, &opts).unwrap();
        assert!(opts.out_dir.join("karate_circular.png").exists());
        assert!(opts.out_dir.join("karate_circular.svg").exists());
    }

    #[test]
    fn test_small_palette_fails_fast() {
        // More communities than palette entries must be a hard error.
        let dir = tempfile::tempdir().unwrap();
        let mut opts = temp_options(&dir);
        opts.palette = Palette::new(vec![]);
        let graph = Graph::karate_club();
        assert!(draw_comm_detection_res(&graph, &KnownKarate, &opts).is_err());
    }
}
