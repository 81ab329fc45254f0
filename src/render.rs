// Rendering context over plotters. A canvas owns the vertex positions
// and a queue of draw operations, replayed onto a bitmap or SVG backend
// at export time. No global figure state is involved.
use std::fs;
use std::path::Path;

use derive_more::Display;
use itertools::{Itertools, MinMaxResult};
use log::debug;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Text};
use plotters::prelude::{BitMapBackend, SVGBackend};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as ColorExt, IntoFont, RGBAColor, RGBColor, ShapeStyle, WHITE};
use serde::{Deserialize, Serialize};

use crate::config::{
    CANVAS_MARGIN, DEFAULT_CANVAS_SIZE, DEFAULT_EDGE_WIDTH, DEFAULT_FONT_SIZE,
    DEFAULT_NODE_RADIUS, EDGE_ALPHA, HIGHLIGHT_EDGE_WIDTH, NODE_ALPHA,
};
use crate::layout::Positions;
use crate::types::{CommID, Edge, VInt};

#[derive(Debug, Display)]
pub enum RenderError {
    #[display(fmt = "community {} exceeds the configured palette of {} colors", _0, _1)]
    PaletteExhausted(CommID, usize),
    #[display(fmt = "unsupported image format {:?}, expected png or svg", _0)]
    UnsupportedFormat(String),
    #[display(fmt = "cannot create output directory {}: {}", _0, _1)]
    CreateDir(String, String),
    #[display(fmt = "drawing backend failure: {}", _0)]
    Backend(String),
}

impl std::error::Error for RenderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 214, g: 39, b: 40 };
    pub const GREEN: Color = Color { r: 44, g: 160, b: 44 };
    pub const BLUE: Color = Color { r: 31, g: 119, b: 180 };
    pub const YELLOW: Color = Color { r: 230, g: 200, b: 30 };
    pub const GREY: Color = Color { r: 128, g: 128, b: 128 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    fn with_alpha(&self, alpha: f64) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, alpha)
    }
}

/// Explicit community-to-color configuration. Lookups past the end of
/// the palette fail instead of wrapping around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            colors: vec![Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW],
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Palette {
        Palette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color_for(&self, comm_id: CommID) -> Result<Color, RenderError> {
        self.colors
            .get(comm_id as usize)
            .copied()
            .ok_or(RenderError::PaletteExhausted(comm_id, self.colors.len()))
    }
}

/// Styling knobs shared by all renders, loadable from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStyle {
    pub node_radius: u32,
    pub font_size: u32,
    pub edge_width: u32,
    pub highlight_width: u32,
    pub node_alpha: f64,
    pub edge_alpha: f64,
    pub canvas_size: (u32, u32),
}

impl Default for RenderStyle {
    fn default() -> RenderStyle {
        RenderStyle {
            node_radius: DEFAULT_NODE_RADIUS,
            font_size: DEFAULT_FONT_SIZE,
            edge_width: DEFAULT_EDGE_WIDTH,
            highlight_width: HIGHLIGHT_EDGE_WIDTH,
            node_alpha: NODE_ALPHA,
            edge_alpha: EDGE_ALPHA,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl RenderStyle {
    pub fn from_yaml_file(file_path: &Path) -> anyhow::Result<RenderStyle> {
        let content = fs::read_to_string(file_path)?;
        let style: RenderStyle = serde_yaml::from_str(&content)?;
        Ok(style)
    }
}

enum DrawOp {
    Edges {
        edges: Vec<Edge>,
        color: Color,
        width: u32,
        alpha: f64,
    },
    Nodes {
        nodes: Vec<VInt>,
        color: Color,
        alpha: f64,
    },
    Labels {
        color: Color,
    },
}

/// A rendering context bound to one set of vertex positions. Draw calls
/// accumulate in order; `export` replays them onto the chosen backend.
pub struct Canvas {
    positions: Positions,
    style: RenderStyle,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(positions: Positions, style: RenderStyle) -> Canvas {
        Canvas {
            positions,
            style,
            ops: Vec::new(),
        }
    }

    pub fn draw_edges(&mut self, edges: &[Edge], color: Color, width: u32, alpha: f64) {
        self.ops.push(DrawOp::Edges {
            edges: edges.to_vec(),
            color,
            width,
            alpha,
        });
    }

    pub fn draw_nodes(&mut self, nodes: &[VInt], color: Color, alpha: f64) {
        self.ops.push(DrawOp::Nodes {
            nodes: nodes.to_vec(),
            color,
            alpha,
        });
    }

    pub fn draw_labels(&mut self, color: Color) {
        self.ops.push(DrawOp::Labels { color });
    }

    /// Write the composed image, picking the backend from the file
    /// extension and creating the target directory when absent.
    pub fn export(&self, file_path: &Path) -> Result<(), RenderError> {
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    RenderError::CreateDir(parent.display().to_string(), err.to_string())
                })?;
            }
        }
        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        match extension {
            "png" => {
                let root =
                    BitMapBackend::new(file_path, self.style.canvas_size).into_drawing_area();
                self.paint(&root)?;
                root.present()
                    .map_err(|err| RenderError::Backend(err.to_string()))?;
            }
            "svg" => {
                let root = SVGBackend::new(file_path, self.style.canvas_size).into_drawing_area();
                self.paint(&root)?;
                root.present()
                    .map_err(|err| RenderError::Backend(err.to_string()))?;
            }
            other => return Err(RenderError::UnsupportedFormat(other.to_string())),
        }
        debug!("Exported {} draw ops to {}", self.ops.len(), file_path.display());
        Ok(())
    }

    fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)
            .map_err(|err| RenderError::Backend(err.to_string()))?;
        let pixel_map = self.pixel_positions();
        for op in &self.ops {
            match op {
                DrawOp::Edges {
                    edges,
                    color,
                    width,
                    alpha,
                } => {
                    let style = ShapeStyle {
                        color: color.with_alpha(*alpha),
                        filled: false,
                        stroke_width: *width,
                    };
                    for (src, dst) in edges {
                        if let (Some(from), Some(to)) = (pixel_map.get(src), pixel_map.get(dst)) {
                            root.draw(&PathElement::new(vec![*from, *to], style))
                                .map_err(|err| RenderError::Backend(err.to_string()))?;
                        }
                    }
                }
                DrawOp::Nodes {
                    nodes,
                    color,
                    alpha,
                } => {
                    for vertex in nodes {
                        if let Some(center) = pixel_map.get(vertex) {
                            root.draw(&Circle::new(
                                *center,
                                self.style.node_radius as i32,
                                color.with_alpha(*alpha).filled(),
                            ))
                            .map_err(|err| RenderError::Backend(err.to_string()))?;
                        }
                    }
                }
                DrawOp::Labels { color } => {
                    let font = ("sans-serif", self.style.font_size)
                        .into_font()
                        .color(&RGBColor(color.r, color.g, color.b))
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    for (vertex, center) in &pixel_map {
                        root.draw(&Text::new(vertex.to_string(), *center, font.clone()))
                            .map_err(|err| RenderError::Backend(err.to_string()))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fit layout coordinates into the canvas, leaving a margin and
    /// flipping the y axis so larger y is drawn higher.
    fn pixel_positions(&self) -> std::collections::BTreeMap<VInt, (i32, i32)> {
        let (width, height) = self.style.canvas_size;
        let (min_x, max_x) = spread(self.positions.values().map(|point| point.x).minmax());
        let (min_y, max_y) = spread(self.positions.values().map(|point| point.y).minmax());
        let scale_x = (width as f64 - 2.0 * CANVAS_MARGIN) / (max_x - min_x);
        let scale_y = (height as f64 - 2.0 * CANVAS_MARGIN) / (max_y - min_y);
        self.positions
            .iter()
            .map(|(vertex, point)| {
                let px = CANVAS_MARGIN + (point.x - min_x) * scale_x;
                let py = height as f64 - CANVAS_MARGIN - (point.y - min_y) * scale_y;
                (*vertex, (px as i32, py as i32))
            })
            .collect()
    }
}

/// Turn a min-max result into a non-degenerate interval.
fn spread(bounds: MinMaxResult<f64>) -> (f64, f64) {
    match bounds {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(value) => (value - 1.0, value + 1.0),
        MinMaxResult::MinMax(min, max) => {
            if (max - min).abs() < f64::EPSILON {
                (min - 1.0, max + 1.0)
            } else {
                (min, max)
            }
        }
    }
}

#[cfg(test)]
mod test_render {
    use std::io::Write;

    use crate::graph::Graph;
    use crate::layout::{compute_layout, LayoutKind};
    use crate::render::{Canvas, Color, Palette, RenderError, RenderStyle};

    #[test]
    fn test_palette_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.color_for(0).unwrap(), Color::RED);
        assert_eq!(palette.color_for(3).unwrap(), Color::YELLOW);
        match palette.color_for(4) {
            Err(RenderError::PaletteExhausted(4, 4)) => {}
            other => panic!("expected PaletteExhausted, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_style_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "node_radius: 10").unwrap();
        writeln!(file, "font_size: 12").unwrap();
        writeln!(file, "edge_width: 2").unwrap();
        writeln!(file, "highlight_width: 5").unwrap();
        writeln!(file, "node_alpha: 0.9").unwrap();
        writeln!(file, "edge_alpha: 0.4").unwrap();
        writeln!(file, "canvas_size: [640, 480]").unwrap();
        let style = RenderStyle::from_yaml_file(file.path()).unwrap();
        assert_eq!(style.node_radius, 10);
        assert_eq!(style.canvas_size, (640, 480));
    }

    #[test]
    fn test_export_png_and_svg() {
        let graph = Graph::from_edge_list(&[(0, 1), (1, 2), (2, 0)]);
        let positions = compute_layout(&graph, LayoutKind::Circular, 0);
        let mut canvas = Canvas::new(positions, RenderStyle::default());
        canvas.draw_edges(&graph.edges(), Color::GREY, 4, 0.5);
        canvas.draw_nodes(&graph.vertices().collect::<Vec<_>>(), Color::RED, 0.8);

        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("nested").join("triangle.png");
        canvas.export(&png_path).unwrap();
        assert!(png_path.exists());
        let svg_path = dir.path().join("triangle.svg");
        canvas.export(&svg_path).unwrap();
        assert!(svg_path.exists());
    }

    #[test]
    fn test_export_rejects_unknown_format() {
        let canvas = Canvas::new(Default::default(), RenderStyle::default());
        let dir = tempfile::tempdir().unwrap();
        let result = canvas.export(&dir.path().join("plot.gif"));
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(_))));
    }
}
