/// Vertex identifier, unique in this system.
pub type VInt = u32;

/// Community identifier, a small non-negative integer.
pub type CommID = u32;

/// An undirected edge between two vertices.
pub type Edge = (VInt, VInt);

/// A 2-D coordinate produced by a layout algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}
