use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use fixedbitset::FixedBitSet;
use log::info;

use crate::config::READ_BUFFER_SIZE;
use crate::partition::CommStructure;
use crate::types::{Edge, VInt};

/// The 78 edges of Zachary's karate club network, vertices numbered 0..34.
static KARATE_EDGES: [Edge; 78] = [
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8),
    (0, 10), (0, 11), (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31),
    (1, 2), (1, 3), (1, 7), (1, 13), (1, 17), (1, 19), (1, 21), (1, 30),
    (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27), (2, 28), (2, 32),
    (3, 7), (3, 12), (3, 13),
    (4, 6), (4, 10),
    (5, 6), (5, 10), (5, 16),
    (6, 16),
    (8, 30), (8, 32), (8, 33),
    (9, 33),
    (13, 33),
    (14, 32), (14, 33),
    (15, 32), (15, 33),
    (18, 32), (18, 33),
    (19, 33),
    (20, 32), (20, 33),
    (22, 32), (22, 33),
    (23, 25), (23, 27), (23, 29), (23, 32), (23, 33),
    (24, 25), (24, 27), (24, 31),
    (25, 31),
    (26, 29), (26, 33),
    (27, 33),
    (28, 31), (28, 33),
    (29, 32), (29, 33),
    (30, 32), (30, 33),
    (31, 32), (31, 33),
    (32, 33),
];

/// Undirected graph, stored as a sorted adjacency map.
/// Every edge endpoint is guaranteed to be present in the vertex set.
#[derive(Default)]
pub struct Graph {
    pub(crate) adj_map: BTreeMap<VInt, Vec<VInt>>,
    e_size: u32,
}

impl Graph {
    pub fn new() -> Graph {
        // Create a new empty graph.
        Graph {
            adj_map: BTreeMap::new(),
            e_size: 0u32,
        }
    }

    /// Build an undirected graph from an edge list. Both endpoints of every
    /// edge are registered as vertices; duplicated edges are kept once.
    pub fn from_edge_list(edges: &[Edge]) -> Graph {
        let mut graph = Graph::new();
        for &(src, dst) in edges {
            graph.add_edge(src, dst);
        }
        graph
    }

    /// The well-known karate-club social network.
    pub fn karate_club() -> Graph {
        Graph::from_edge_list(&KARATE_EDGES)
    }

    pub fn add_vertex(&mut self, vertex_id: VInt) {
        self.adj_map.entry(vertex_id).or_insert_with(Vec::new);
    }

    pub fn add_edge(&mut self, src: VInt, dst: VInt) {
        self.add_vertex(src);
        self.add_vertex(dst);
        let successors = self.adj_map.get_mut(&src).unwrap();
        if successors.contains(&dst) {
            // The edge already exists, skip it.
            return;
        }
        successors.push(dst);
        if src != dst {
            self.adj_map.get_mut(&dst).unwrap().push(src);
        }
        self.e_size += 1;
    }

    pub fn v_size(&self) -> u32 {
        self.adj_map.len() as u32
    }

    pub fn e_size(&self) -> u32 {
        self.e_size
    }

    pub fn contains_vertex(&self, vertex_id: &VInt) -> bool {
        self.adj_map.contains_key(vertex_id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VInt> + '_ {
        self.adj_map.keys().copied()
    }

    pub fn get_neighbor(&self, vertex_id: &VInt) -> Vec<VInt> {
        if self.adj_map.contains_key(vertex_id) {
            self.adj_map.get(vertex_id).unwrap().clone()
        } else {
            vec![]
        }
    }

    pub fn degree(&self, vertex_id: &VInt) -> usize {
        match self.adj_map.get(vertex_id) {
            None => 0,
            Some(neighbors) => neighbors.len(),
        }
    }

    /// Collect each undirected edge exactly once, normalized to
    /// `(min, max)` and ordered by the adjacency map traversal.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edge_list = Vec::with_capacity(self.e_size as usize);
        for (src, neighbors) in &self.adj_map {
            for dst in neighbors {
                if src < dst {
                    edge_list.push((*src, *dst));
                }
            }
        }
        edge_list
    }

    /// BFS reachability check from the smallest vertex.
    pub fn is_connected(&self) -> bool {
        let vertex_count = self.adj_map.len();
        if vertex_count <= 1 {
            return true;
        }
        let index_map: BTreeMap<VInt, usize> = self
            .vertices()
            .enumerate()
            .map(|(idx, v)| (v, idx))
            .collect();
        let mut visited = FixedBitSet::with_capacity(vertex_count);
        let start = *self.adj_map.keys().next().unwrap();
        let mut frontier = vec![start];
        visited.insert(index_map[&start]);
        while let Some(vertex) = frontier.pop() {
            for neighbor in &self.adj_map[&vertex] {
                let neighbor_idx = index_map[neighbor];
                if !visited.contains(neighbor_idx) {
                    visited.insert(neighbor_idx);
                    frontier.push(*neighbor);
                }
            }
        }
        visited.count_ones(..) == vertex_count
    }

    /// Load a graph and its community structure from a `.graph` file.
    /// The first line is a header; the rest are `v <id> <label> <comm>`
    /// and `e <src> <dst>` records.
    pub fn from_graph_file(file_path: &Path) -> anyhow::Result<(Graph, CommStructure)> {
        let graph_file = File::open(file_path)
            .with_context(|| format!("cannot open graph file {}", file_path.display()))?;
        let graph_reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);
        let mut graph = Graph::new();
        let mut comm_structure_map = BTreeMap::<VInt, Vec<VInt>>::new();
        let mut line_count = 0u32;
        for line in graph_reader.lines() {
            let line = line?;
            line_count += 1;
            if line_count == 1 {
                // The first line, just skip it.
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            match tokens[0] {
                "v" if tokens.len() == 4 => {
                    // Process vertices, and record the community.
                    let parsed_vid = tokens[1]
                        .parse::<VInt>()
                        .with_context(|| format!("bad vertex id at line {}", line_count))?;
                    let comm_id = tokens[3]
                        .parse::<VInt>()
                        .with_context(|| format!("bad community id at line {}", line_count))?;
                    graph.add_vertex(parsed_vid);
                    comm_structure_map
                        .entry(comm_id)
                        .or_insert_with(Vec::new)
                        .push(parsed_vid);
                }
                "e" if tokens.len() == 3 => {
                    // Process edges.
                    let parsed_src = tokens[1]
                        .parse::<VInt>()
                        .with_context(|| format!("bad edge source at line {}", line_count))?;
                    let parsed_dst = tokens[2]
                        .parse::<VInt>()
                        .with_context(|| format!("bad edge target at line {}", line_count))?;
                    graph.add_edge(parsed_src, parsed_dst);
                }
                _ => {
                    bail!(
                        "unresolved record {:?} at line {} of {}",
                        tokens[0],
                        line_count,
                        file_path.display()
                    );
                }
            }
        }
        let comm_structure: CommStructure = comm_structure_map.into_values().collect();
        Ok((graph, comm_structure))
    }
}

/// Log the degree of every vertex, smallest id first.
pub fn traverse_degree(graph: &Graph) {
    info!("Node Degree");
    for vertex in graph.vertices() {
        info!("{} {}", vertex, graph.degree(&vertex));
    }
}
