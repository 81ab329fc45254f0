// Community-detection providers. Detection quality is not the point here;
// the providers exist to hand the renderer a full vertex-to-community map.
use std::collections::BTreeMap;

use anyhow::{bail, Result};
use log::{debug, info};

use crate::config::LP_MAX_ROUNDS;
use crate::graph::Graph;
use crate::partition::{CommDict, CommStructure, Partition};
use crate::types::VInt;

/// Produces the community map and the vertex partition of a graph.
/// Every graph vertex must end up with exactly one partition entry.
pub trait CommunityProvider {
    fn detect(&self, graph: &Graph) -> Result<(CommDict, Partition)>;
}

/// The canonical four-community split of the karate-club graph.
static KARATE_COMMUNITIES: [&[VInt]; 4] = [
    &[0, 1, 2, 3, 7, 11, 12, 13, 17, 19, 21],
    &[4, 5, 6, 10, 16],
    &[8, 9, 14, 15, 18, 20, 22, 26, 29, 30, 32, 33],
    &[23, 24, 25, 27, 28, 31],
];

/// Canned partition for the karate-club graph, standing in for the
/// external detection module of the original study.
pub struct KnownKarate;

impl CommunityProvider for KnownKarate {
    fn detect(&self, graph: &Graph) -> Result<(CommDict, Partition)> {
        let comm_structure: CommStructure = KARATE_COMMUNITIES
            .iter()
            .map(|community| community.to_vec())
            .collect();
        let partition = Partition::from_comm_structure(&comm_structure);
        check_coverage(graph, &partition)?;
        info!(
            "Fixed karate partition: {} communities over {} vertices",
            comm_structure.len(),
            partition.len()
        );
        Ok((partition.comm_dict(), partition))
    }
}

/// Replays a community structure loaded alongside a graph file.
pub struct FixedStructure {
    comm_structure: CommStructure,
}

impl FixedStructure {
    pub fn new(comm_structure: CommStructure) -> FixedStructure {
        FixedStructure { comm_structure }
    }
}

impl CommunityProvider for FixedStructure {
    fn detect(&self, graph: &Graph) -> Result<(CommDict, Partition)> {
        let partition = Partition::from_comm_structure(&self.comm_structure);
        check_coverage(graph, &partition)?;
        Ok((partition.comm_dict(), partition))
    }
}

/// Synchronous-order label propagation: every vertex starts in its own
/// community and repeatedly adopts the most frequent label among its
/// neighbors. Ties keep the current label when possible, otherwise the
/// smallest candidate, so runs are deterministic.
pub struct LabelPropagation {
    pub max_rounds: u32,
}

impl Default for LabelPropagation {
    fn default() -> LabelPropagation {
        LabelPropagation {
            max_rounds: LP_MAX_ROUNDS,
        }
    }
}

impl CommunityProvider for LabelPropagation {
    fn detect(&self, graph: &Graph) -> Result<(CommDict, Partition)> {
        let mut labels: BTreeMap<VInt, VInt> =
            graph.vertices().map(|vertex| (vertex, vertex)).collect();
        for round in 0..self.max_rounds {
            let mut changed = false;
            for vertex in graph.vertices() {
                let mut counts = BTreeMap::<VInt, u32>::new();
                for neighbor in graph.get_neighbor(&vertex) {
                    *counts.entry(labels[&neighbor]).or_insert(0) += 1;
                }
                if counts.is_empty() {
                    // Isolated vertex, keeps its own label.
                    continue;
                }
                let best_count = *counts.values().max().unwrap();
                let current = labels[&vertex];
                if counts.get(&current) == Some(&best_count) {
                    continue;
                }
                // Smallest label among the most frequent ones.
                let winner = *counts
                    .iter()
                    .filter(|(_, count)| **count == best_count)
                    .map(|(label, _)| label)
                    .next()
                    .unwrap();
                labels.insert(vertex, winner);
                changed = true;
            }
            if !changed {
                debug!("Label propagation converged after {} rounds", round + 1);
                break;
            }
        }

        // Compact the surviving labels into community ids 0..k.
        let mut groups = BTreeMap::<VInt, Vec<VInt>>::new();
        for (vertex, label) in &labels {
            groups.entry(*label).or_insert_with(Vec::new).push(*vertex);
        }
        let comm_structure: CommStructure = groups.into_values().collect();
        let partition = Partition::from_comm_structure(&comm_structure);
        info!(
            "Label propagation found {} communities over {} vertices",
            comm_structure.len(),
            partition.len()
        );
        Ok((partition.comm_dict(), partition))
    }
}

fn check_coverage(graph: &Graph, partition: &Partition) -> Result<()> {
    for vertex in graph.vertices() {
        if partition.lookup(&vertex).is_none() {
            bail!("vertex {} has no community assignment", vertex);
        }
    }
    Ok(())
}
