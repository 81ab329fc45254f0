// Group intra-community edges by the community of their endpoints.
use std::collections::BTreeMap;

use derive_more::Display;

use crate::partition::Partition;
use crate::types::{CommID, Edge, VInt};

/// Edge groups keyed by community id; inter-community edges are in no group.
pub type EdgeGroups = BTreeMap<CommID, Vec<Edge>>;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ClassifyError {
    #[display(fmt = "vertex {} of edge ({}, {}) has no partition entry", _2, _0, _1)]
    MissingVertex(VInt, VInt, VInt),
}

impl std::error::Error for ClassifyError {}

/// Classify edges by community membership. An edge lands in the group of
/// community `c` exactly when both endpoints belong to `c`; edges crossing
/// communities are dropped. Every community id of the partition gets a
/// group, empty ones included, and input order is preserved per group.
pub fn classify_edges(edges: &[Edge], partition: &Partition) -> Result<EdgeGroups, ClassifyError> {
    // Step 1. Seed one empty group per community id.
    let mut groups: EdgeGroups = partition
        .community_ids()
        .into_iter()
        .map(|comm_id| (comm_id, Vec::new()))
        .collect();

    // Step 2. Route every intra-community edge to its group.
    for &(src, dst) in edges {
        let src_comm = partition
            .lookup(&src)
            .ok_or(ClassifyError::MissingVertex(src, dst, src))?;
        let dst_comm = partition
            .lookup(&dst)
            .ok_or(ClassifyError::MissingVertex(src, dst, dst))?;
        if src_comm == dst_comm {
            groups.entry(src_comm).or_default().push((src, dst));
        }
    }
    Ok(groups)
}

#[cfg(test)]
mod test_classify {
    use std::collections::BTreeSet;

    use crate::classify::{classify_edges, ClassifyError};
    use crate::detect::{CommunityProvider, KnownKarate};
    use crate::graph::Graph;
    use crate::partition::Partition;
    use crate::types::Edge;

    fn small_partition() -> Partition {
        Partition::from_comm_structure(&vec![vec![1, 2, 3], vec![4]])
    }

    #[test]
    fn test_concrete_scenario() {
        let edges: Vec<Edge> = vec![(1, 2), (2, 3), (3, 1), (1, 4)];
        let groups = classify_edges(&edges, &small_partition()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&0], vec![(1, 2), (2, 3), (3, 1)]);
        assert_eq!(groups[&1], Vec::<Edge>::new());
    }

    #[test]
    fn test_empty_edge_list() {
        let groups = classify_edges(&[], &small_partition()).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.values().all(|group| group.is_empty()));
    }

    #[test]
    fn test_single_community_keeps_all_edges() {
        let edges: Vec<Edge> = vec![(1, 2), (2, 3), (3, 1)];
        let partition = Partition::from_comm_structure(&vec![vec![1, 2, 3]]);
        let groups = classify_edges(&edges, &partition).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&0], edges);
    }

    #[test]
    fn test_idempotent() {
        let edges: Vec<Edge> = vec![(1, 2), (2, 3), (3, 1), (1, 4)];
        let partition = small_partition();
        let first = classify_edges(&edges, &partition).unwrap();
        let second = classify_edges(&edges, &partition).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_vertex_fails() {
        let edges: Vec<Edge> = vec![(1, 9)];
        let result = classify_edges(&edges, &small_partition());
        assert_eq!(result.unwrap_err(), ClassifyError::MissingVertex(1, 9, 9));
    }

    #[test]
    fn test_karate_union_and_disjointness() {
        // The union of all groups must be exactly the same-community edges,
        // with no edge counted twice.
        let graph = Graph::karate_club();
        let (_, partition) = KnownKarate.detect(&graph).unwrap();
        let edges = graph.edges();
        let groups = classify_edges(&edges, &partition).unwrap();

        let mut grouped = BTreeSet::new();
        for group in groups.values() {
            for edge in group {
                assert!(grouped.insert(*edge), "edge {:?} appears twice", edge);
            }
        }
        for edge in &edges {
            let same_comm = partition.lookup(&edge.0) == partition.lookup(&edge.1);
            assert_eq!(grouped.contains(edge), same_comm);
        }
    }
}
