// Canned 2-D layout algorithms. Fidelity to any particular drawing
// package is not a goal; every algorithm returns a coordinate for each
// vertex of the graph.
use std::collections::BTreeMap;
use std::f64::consts::PI;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FORCE_ITERATIONS, SPECTRAL_POWER_STEPS, SPRING_ITERATIONS};
use crate::graph::Graph;
use crate::types::{Point, VInt};

pub type Positions = BTreeMap<VInt, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Random,
    Circular,
    Spectral,
    Shell,
    Spring,
    ForceDirected,
}

impl LayoutKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Random => "random",
            LayoutKind::Circular => "circular",
            LayoutKind::Spectral => "spectral",
            LayoutKind::Shell => "shell",
            LayoutKind::Spring => "spring",
            LayoutKind::ForceDirected => "force-directed",
        }
    }
}

/// Compute coordinates for every vertex. `Circular`, `Shell` and
/// `Spectral` are deterministic; the others start from a seeded RNG.
pub fn compute_layout(graph: &Graph, kind: LayoutKind, seed: u64) -> Positions {
    debug!("Computing {} layout for {} vertices", kind.name(), graph.v_size());
    match kind {
        LayoutKind::Random => random_layout(graph, seed),
        LayoutKind::Circular => circular_layout(graph),
        LayoutKind::Spectral => spectral_layout(graph),
        LayoutKind::Shell => shell_layout(graph),
        LayoutKind::Spring => spring_layout(graph, seed, SPRING_ITERATIONS, 1.0),
        LayoutKind::ForceDirected => spring_layout(graph, seed, FORCE_ITERATIONS, 1.3),
    }
}

fn random_layout(graph: &Graph, seed: u64) -> Positions {
    let mut rng = StdRng::seed_from_u64(seed);
    graph
        .vertices()
        .map(|vertex| {
            let point = Point::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            (vertex, point)
        })
        .collect()
}

fn circular_layout(graph: &Graph) -> Positions {
    place_on_circle(graph.vertices().collect(), 1.0)
}

/// Concentric rings: vertices with above-average degree form the inner
/// shell, the rest the outer one. Degenerate splits fall back to a
/// single circle.
fn shell_layout(graph: &Graph) -> Positions {
    let vertex_count = graph.v_size();
    if vertex_count == 0 {
        return Positions::new();
    }
    let degree_sum: usize = graph.vertices().map(|v| graph.degree(&v)).sum();
    let mean_degree = degree_sum as f64 / vertex_count as f64;
    let (inner, outer): (Vec<VInt>, Vec<VInt>) = graph
        .vertices()
        .partition(|vertex| graph.degree(vertex) as f64 > mean_degree);
    if inner.is_empty() || outer.is_empty() {
        return circular_layout(graph);
    }
    let mut positions = place_on_circle(inner, 0.5);
    positions.extend(place_on_circle(outer, 1.0));
    positions
}

fn place_on_circle(vertices: Vec<VInt>, radius: f64) -> Positions {
    let count = vertices.len();
    vertices
        .into_iter()
        .enumerate()
        .map(|(idx, vertex)| {
            let angle = 2.0 * PI * idx as f64 / count as f64;
            (vertex, Point::new(radius * angle.cos(), radius * angle.sin()))
        })
        .collect()
}

/// Fruchterman-Reingold force simulation with linear temperature decay.
fn spring_layout(graph: &Graph, seed: u64, iterations: u32, spread: f64) -> Positions {
    let ids: Vec<VInt> = graph.vertices().collect();
    let vertex_count = ids.len();
    if vertex_count == 0 {
        return Positions::new();
    }
    if vertex_count == 1 {
        return Positions::from([(ids[0], Point::default())]);
    }
    let index_map: BTreeMap<VInt, usize> = ids
        .iter()
        .enumerate()
        .map(|(idx, vertex)| (*vertex, idx))
        .collect();
    let edges: Vec<(usize, usize)> = graph
        .edges()
        .into_iter()
        .map(|(src, dst)| (index_map[&src], index_map[&dst]))
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<Point> = (0..vertex_count)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    // The ideal pairwise distance for a unit-square drawing area.
    let k = spread * (1.0 / vertex_count as f64).sqrt();
    let mut temperature = 0.1f64;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![Point::default(); vertex_count];
        // Repulsion between every vertex pair.
        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / dist;
                disp[i].x += dx / dist * force;
                disp[i].y += dy / dist * force;
                disp[j].x -= dx / dist * force;
                disp[j].y -= dy / dist * force;
            }
        }
        // Attraction along edges.
        for &(i, j) in &edges {
            let dx = pos[i].x - pos[j].x;
            let dy = pos[i].y - pos[j].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = dist * dist / k;
            disp[i].x -= dx / dist * force;
            disp[i].y -= dy / dist * force;
            disp[j].x += dx / dist * force;
            disp[j].y += dy / dist * force;
        }
        // Displace, capped by the current temperature.
        for i in 0..vertex_count {
            let len = (disp[i].x * disp[i].x + disp[i].y * disp[i].y)
                .sqrt()
                .max(1e-9);
            let capped = len.min(temperature);
            pos[i].x += disp[i].x / len * capped;
            pos[i].y += disp[i].y / len * capped;
        }
        temperature = (temperature - cooling).max(1e-4);
    }

    ids.into_iter().zip(pos).collect()
}

/// Coordinates from the two smallest non-trivial Laplacian eigenvectors,
/// found by power iteration on the shifted operator `cI - L`.
fn spectral_layout(graph: &Graph) -> Positions {
    let ids: Vec<VInt> = graph.vertices().collect();
    let vertex_count = ids.len();
    if vertex_count == 0 {
        return Positions::new();
    }
    if vertex_count == 1 {
        return Positions::from([(ids[0], Point::default())]);
    }
    if vertex_count == 2 {
        return Positions::from([
            (ids[0], Point::new(-1.0, 0.0)),
            (ids[1], Point::new(1.0, 0.0)),
        ]);
    }
    if !graph.is_connected() {
        warn!("Spectral layout on a disconnected graph may overlap components");
    }
    let index_map: BTreeMap<VInt, usize> = ids
        .iter()
        .enumerate()
        .map(|(idx, vertex)| (*vertex, idx))
        .collect();
    let neighbor_rows: Vec<Vec<usize>> = ids
        .iter()
        .map(|vertex| {
            graph
                .get_neighbor(vertex)
                .iter()
                .map(|neighbor| index_map[neighbor])
                .collect()
        })
        .collect();
    let degrees: Vec<f64> = neighbor_rows.iter().map(|row| row.len() as f64).collect();
    let max_degree = degrees.iter().cloned().fold(0.0f64, f64::max);
    let shift = 2.0 * max_degree + 1.0;

    // The constant vector is the trivial Laplacian eigenvector; keep the
    // iterated vectors orthogonal to it and to each other.
    let uniform = vec![1.0 / (vertex_count as f64).sqrt(); vertex_count];
    let mut basis: Vec<Vec<f64>> = vec![uniform];
    let mut axes: Vec<Vec<f64>> = Vec::with_capacity(2);
    for axis in 0..2usize {
        let mut vector: Vec<f64> = (0..vertex_count)
            .map(|idx| ((idx + axis + 1) as f64 * 0.739_085).sin())
            .collect();
        for _ in 0..SPECTRAL_POWER_STEPS {
            orthogonalize(&mut vector, &basis);
            normalize(&mut vector);
            let mut next = vec![0.0f64; vertex_count];
            for idx in 0..vertex_count {
                next[idx] = (shift - degrees[idx]) * vector[idx];
                for &neighbor in &neighbor_rows[idx] {
                    next[idx] += vector[neighbor];
                }
            }
            vector = next;
        }
        orthogonalize(&mut vector, &basis);
        normalize(&mut vector);
        basis.push(vector.clone());
        axes.push(vector);
    }

    ids.into_iter()
        .enumerate()
        .map(|(idx, vertex)| (vertex, Point::new(axes[0][idx], axes[1][idx])))
        .collect()
}

fn orthogonalize(vector: &mut [f64], basis: &[Vec<f64>]) {
    for base in basis {
        let dot: f64 = vector.iter().zip(base).map(|(a, b)| a * b).sum();
        for (value, base_value) in vector.iter_mut().zip(base) {
            *value -= dot * base_value;
        }
    }
}

fn normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|value| value * value).sum::<f64>().sqrt();
    if norm > 1e-12 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod test_layout {
    use crate::graph::Graph;
    use crate::layout::{compute_layout, LayoutKind};

    static ALL_KINDS: [LayoutKind; 6] = [
        LayoutKind::Random,
        LayoutKind::Circular,
        LayoutKind::Spectral,
        LayoutKind::Shell,
        LayoutKind::Spring,
        LayoutKind::ForceDirected,
    ];

    #[test]
    fn test_every_vertex_gets_a_position() {
        let graph = Graph::karate_club();
        for kind in ALL_KINDS {
            let positions = compute_layout(&graph, kind, 7);
            assert_eq!(positions.len(), 34, "{} layout lost vertices", kind.name());
            for point in positions.values() {
                assert!(point.x.is_finite() && point.y.is_finite());
            }
        }
    }

    #[test]
    fn test_circular_is_unit_circle() {
        let graph = Graph::from_edge_list(&[(0, 1), (1, 2), (2, 3)]);
        let positions = compute_layout(&graph, LayoutKind::Circular, 0);
        for point in positions.values() {
            let radius = (point.x * point.x + point.y * point.y).sqrt();
            assert!((radius - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_is_seed_reproducible() {
        let graph = Graph::karate_club();
        let first = compute_layout(&graph, LayoutKind::Random, 99);
        let second = compute_layout(&graph, LayoutKind::Random, 99);
        assert_eq!(first, second);
        let other_seed = compute_layout(&graph, LayoutKind::Random, 100);
        assert_ne!(first, other_seed);
    }

    #[test]
    fn test_single_vertex_at_origin() {
        let mut graph = Graph::new();
        graph.add_vertex(5);
        for kind in ALL_KINDS {
            let positions = compute_layout(&graph, kind, 1);
            assert_eq!(positions.len(), 1);
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        for kind in ALL_KINDS {
            assert!(compute_layout(&graph, kind, 1).is_empty());
        }
    }

    #[test]
    fn test_spectral_separates_a_path() {
        // On a path graph the Fiedler vector orders the vertices.
        let graph = Graph::from_edge_list(&[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let positions = compute_layout(&graph, LayoutKind::Spectral, 0);
        let xs: Vec<f64> = positions.values().map(|p| p.x).collect();
        let monotone_up = xs.windows(2).all(|w| w[0] <= w[1]);
        let monotone_down = xs.windows(2).all(|w| w[0] >= w[1]);
        assert!(monotone_up || monotone_down, "positions not ordered: {:?}", xs);
    }
}
