use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::models::MapCoordinate;
use crate::planner::cluster::Cluster;

/// A tile chosen as a border or query endpoint representative for the
/// abstract graph. A node lives on a specific tile and belongs to the one
/// cluster containing that tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractNode {
    level: i32,
    cluster_coordinate: MapCoordinate,
    tile_coordinate: MapCoordinate,
    is_ephemeral: bool,
    // Live references to an ephemeral node; the node is reclaimed when the
    // set empties.
    ephemeral_keys: FxHashSet<u64>,
}

impl AbstractNode {
    pub fn new(
        level: i32,
        cluster_coordinate: MapCoordinate,
        tile_coordinate: MapCoordinate,
    ) -> AbstractNode {
        AbstractNode {
            level,
            cluster_coordinate,
            tile_coordinate,
            is_ephemeral: false,
            ephemeral_keys: FxHashSet::default(),
        }
    }

    pub fn new_ephemeral(
        level: i32,
        cluster_coordinate: MapCoordinate,
        tile_coordinate: MapCoordinate,
    ) -> AbstractNode {
        AbstractNode {
            is_ephemeral: true,
            ..AbstractNode::new(level, cluster_coordinate, tile_coordinate)
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn cluster_coordinate(&self) -> MapCoordinate {
        self.cluster_coordinate
    }

    pub fn tile_coordinate(&self) -> MapCoordinate {
        self.tile_coordinate
    }

    pub fn is_ephemeral(&self) -> bool {
        self.is_ephemeral
    }

    pub fn ephemeral_keys(&self) -> &FxHashSet<u64> {
        &self.ephemeral_keys
    }

    pub(crate) fn insert_ephemeral_key(&mut self, key: u64) {
        self.ephemeral_keys.insert(key);
    }

    /// Removes a key and reports whether any live references remain.
    pub(crate) fn remove_ephemeral_key(&mut self, key: u64) -> bool {
        self.ephemeral_keys.remove(&key);
        !self.ephemeral_keys.is_empty()
    }
}

/// Abstract nodes keyed by tile coordinate, unique per key.
///
/// Iteration order is insertion order, which keeps graph construction
/// deterministic; callers that need a specific order still sort explicitly.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: IndexMap<MapCoordinate, AbstractNode>,
}

impl NodeMap {
    pub fn new() -> NodeMap {
        NodeMap::default()
    }

    /// Inserts a node, overwriting any node already at its tile coordinate.
    pub fn add(&mut self, n: AbstractNode) {
        self.nodes.insert(n.tile_coordinate(), n);
    }

    pub fn get(&self, tc: MapCoordinate) -> Option<&AbstractNode> {
        self.nodes.get(&tc)
    }

    pub fn get_mut(&mut self, tc: MapCoordinate) -> Option<&mut AbstractNode> {
        self.nodes.get_mut(&tc)
    }

    pub fn remove(&mut self, tc: MapCoordinate) -> Option<AbstractNode> {
        // shift_remove keeps the remaining iteration order stable.
        self.nodes.shift_remove(&tc)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbstractNode> {
        self.nodes.values()
    }

    /// All nodes whose tile lies inside the cluster rectangle.
    pub fn get_by_cluster(&self, cluster: &Cluster) -> Vec<&AbstractNode> {
        self.nodes
            .values()
            .filter(|n| cluster.contains(n.tile_coordinate()))
            .collect()
    }

    /// All nodes on the cluster's perimeter tiles.
    pub fn get_by_cluster_edge(&self, cluster: &Cluster) -> Vec<&AbstractNode> {
        self.nodes
            .values()
            .filter(|n| cluster.on_perimeter(n.tile_coordinate()))
            .collect()
    }
}
