// A partition maps every vertex of a graph to exactly one community.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{CommID, VInt};

/// Communities listed as plain vertex groups; the group index is the
/// community id.
pub type CommStructure = Vec<Vec<VInt>>;

/// Map from a community id to its member vertices, sorted both ways.
pub type CommDict = BTreeMap<CommID, Vec<VInt>>;

/// Vertex-to-community assignment, read-only once produced by a
/// community-detection provider.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    vertex_community_map: HashMap<VInt, CommID>,
}

impl Partition {
    pub fn new() -> Partition {
        Partition {
            vertex_community_map: HashMap::new(),
        }
    }

    /// Build a partition from a community structure, using the group
    /// index as the community id.
    pub fn from_comm_structure(comm_structure: &CommStructure) -> Partition {
        let mut vc_map = HashMap::<VInt, CommID>::new();
        for (comm_id, vertices) in comm_structure.iter().enumerate() {
            for vertex in vertices {
                vc_map.insert(*vertex, comm_id as CommID);
            }
        }
        Partition {
            vertex_community_map: vc_map,
        }
    }

    pub fn assign(&mut self, vertex_id: VInt, comm_id: CommID) {
        self.vertex_community_map.insert(vertex_id, comm_id);
    }

    /// Find the community of a specific vertex.
    pub fn lookup(&self, vertex_id: &VInt) -> Option<CommID> {
        self.vertex_community_map.get(vertex_id).copied()
    }

    pub fn len(&self) -> usize {
        self.vertex_community_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_community_map.is_empty()
    }

    /// Distinct community ids present in this partition, ascending.
    pub fn community_ids(&self) -> Vec<CommID> {
        let id_set: BTreeSet<CommID> = self.vertex_community_map.values().copied().collect();
        id_set.into_iter().collect()
    }

    /// Invert the partition into a community-to-vertices map with
    /// sorted member lists.
    pub fn comm_dict(&self) -> CommDict {
        let mut comm_dict = CommDict::new();
        for (vertex, comm_id) in &self.vertex_community_map {
            comm_dict.entry(*comm_id).or_insert_with(Vec::new).push(*vertex);
        }
        for members in comm_dict.values_mut() {
            members.sort_unstable();
        }
        comm_dict
    }
}

#[cfg(test)]
mod test_partition {
    use crate::partition::{CommStructure, Partition};

    #[test]
    fn test_build_from_comm_structure() {
        let comm_structure: CommStructure = vec![vec![1, 2, 3], vec![4]];
        let partition = Partition::from_comm_structure(&comm_structure);
        assert_eq!(partition.len(), 4);
        assert_eq!(partition.lookup(&2), Some(0));
        assert_eq!(partition.lookup(&4), Some(1));
        assert_eq!(partition.lookup(&9), None);
        assert_eq!(partition.community_ids(), vec![0, 1]);
    }

    #[test]
    fn test_comm_dict_roundtrip() {
        let comm_structure: CommStructure = vec![vec![3, 1, 2], vec![4]];
        let partition = Partition::from_comm_structure(&comm_structure);
        let comm_dict = partition.comm_dict();
        assert_eq!(comm_dict.get(&0), Some(&vec![1, 2, 3]));
        assert_eq!(comm_dict.get(&1), Some(&vec![4]));
    }

    #[test]
    fn test_assign_overwrites() {
        let mut partition = Partition::new();
        partition.assign(7, 0);
        partition.assign(7, 2);
        assert_eq!(partition.lookup(&7), Some(2));
        assert_eq!(partition.community_ids(), vec![2]);
    }
}
