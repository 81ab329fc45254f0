// Default styling values, taken from the original karate-club renders.

pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (1000, 1000);

pub(crate) const CANVAS_MARGIN: f64 = 60.0;

pub const DEFAULT_NODE_RADIUS: u32 = 18;

pub const DEFAULT_FONT_SIZE: u32 = 16;

pub const DEFAULT_EDGE_WIDTH: u32 = 4;

pub const HIGHLIGHT_EDGE_WIDTH: u32 = 8;

pub const NODE_ALPHA: f64 = 0.8;

pub const EDGE_ALPHA: f64 = 0.5;

pub(crate) const SPRING_ITERATIONS: u32 = 50;

pub(crate) const FORCE_ITERATIONS: u32 = 200;

pub(crate) const SPECTRAL_POWER_STEPS: u32 = 500;

pub(crate) const LP_MAX_ROUNDS: u32 = 64;

pub(crate) const READ_BUFFER_SIZE: usize = 128 * 1024;
