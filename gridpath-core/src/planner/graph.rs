use std::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::MapCoordinate;
use crate::planner::cluster::ClusterMap;
use crate::planner::edge::{AbstractEdge, EdgeMap, EdgeType};
use crate::planner::entrance;
use crate::planner::micro_astar;
use crate::planner::node::{AbstractNode, NodeMap};
use crate::tile_map::TileMap;

/// Weight of an INTER edge: one unit tile traverse across the border.
pub const INTER_EDGE_WEIGHT: f64 = 1.0;

// Cluster tiers above level 1 are sketched by the data model but their edges
// are not built; requesting them is an explicit unimplemented error.
const MAX_LEVEL: i32 = 1;

// Process-wide allocator for ephemeral node keys. Zero is reserved to mean
// "no key / insertion was a no-op".
static EPHEMERAL_KEY: AtomicU64 = AtomicU64::new(1);

fn next_ephemeral_key() -> u64 {
    EPHEMERAL_KEY.fetch_add(1, Ordering::Relaxed)
}

/// The abstract inter/intra-edge graph over a clustered tile map.
#[derive(Debug, Clone)]
pub struct Graph {
    pub cluster_map: ClusterMap,
    pub node_map: NodeMap,
    pub edge_map: EdgeMap,
}

impl Graph {
    /// Abstract nodes reachable from the node at `tile` by a single edge.
    pub fn neighbors(&self, tile: MapCoordinate) -> Result<Vec<&AbstractNode>> {
        if self.node_map.get(tile).is_none() {
            return Err(Error::NotFound(format!(
                "no abstract node at ({}, {})",
                tile.x, tile.y
            )));
        }
        Ok(self
            .edge_map
            .get_by_source(tile)
            .into_iter()
            .filter_map(|e| self.node_map.get(e.destination))
            .collect())
    }

    // Ensures a non-ephemeral node at the transition endpoint. A border tile
    // may participate in several transitions; the first insertion wins.
    fn ensure_border_node(&mut self, tile: MapCoordinate) -> Result<()> {
        if self.node_map.get(tile).is_some() {
            return Ok(());
        }
        let cluster_coordinate = self.cluster_map.cluster_containing(tile)?.coordinate();
        let level = self.cluster_map.level();
        self.node_map.add(AbstractNode::new(level, cluster_coordinate, tile));
        Ok(())
    }
}

/// Builds the level-1 abstract graph for a tile map: detects transitions
/// between adjacent clusters, lifts their endpoints into abstract nodes
/// joined by weight-1 INTER edges, and connects the nodes of each cluster
/// with INTRA edges weighted by the in-cluster shortest tile path.
pub fn build_graph(
    tile_map: &TileMap,
    cluster_dimension: MapCoordinate,
    level: i32,
) -> Result<Graph> {
    if level > MAX_LEVEL {
        return Err(Error::Unimplemented(format!(
            "cluster tiers above level {MAX_LEVEL} are not built"
        )));
    }

    let map_dimension = tile_map.dimension();
    if cluster_dimension.x > map_dimension.x || cluster_dimension.y > map_dimension.y {
        return Err(Error::FailedPrecondition(format!(
            "cluster dimension ({}, {}) exceeds the tile map dimension ({}, {})",
            cluster_dimension.x, cluster_dimension.y, map_dimension.x, map_dimension.y
        )));
    }
    if cluster_dimension == MapCoordinate::new(1, 1)
        && map_dimension != MapCoordinate::new(1, 1)
    {
        return Err(Error::FailedPrecondition(
            "cluster dimension (1, 1) admits no interior on a non-trivial map".to_string(),
        ));
    }

    let cluster_map = ClusterMap::build(map_dimension, cluster_dimension, level)?;
    let mut graph = Graph {
        cluster_map,
        node_map: NodeMap::new(),
        edge_map: EdgeMap::new(),
    };

    // Sweep east- and north-facing borders so each adjacent pair is visited
    // exactly once, in deterministic cluster order.
    let dimension = graph.cluster_map.dimension();
    for x in 0..dimension.x {
        for y in 0..dimension.y {
            let c1 = MapCoordinate::new(x, y);
            for c2 in [MapCoordinate::new(x + 1, y), MapCoordinate::new(x, y + 1)] {
                if graph.cluster_map.get(c2).is_err() {
                    continue;
                }
                for t in entrance::build_transitions(tile_map, &graph.cluster_map, c1, c2)? {
                    graph.ensure_border_node(t.n1)?;
                    graph.ensure_border_node(t.n2)?;
                    graph.edge_map.add(AbstractEdge {
                        level,
                        source: t.n1,
                        destination: t.n2,
                        edge_type: EdgeType::Inter,
                        weight: INTER_EDGE_WEIGHT,
                    })?;
                }
            }
        }
    }

    // Intra edges: every node pair of a cluster joined by the cost of the
    // shortest tile path bounded to the cluster rectangle, when one exists.
    for x in 0..dimension.x {
        for y in 0..dimension.y {
            let cluster = *graph.cluster_map.get(MapCoordinate::new(x, y))?;
            let mut tiles: Vec<MapCoordinate> = graph
                .node_map
                .get_by_cluster(&cluster)
                .iter()
                .map(|n| n.tile_coordinate())
                .collect();
            tiles.sort();

            for (t1, t2) in tiles.iter().copied().tuple_combinations() {
                let (path, cost) = micro_astar::path(
                    tile_map,
                    t1,
                    t2,
                    cluster.tile_boundary(),
                    cluster.tile_dimension(),
                )?;
                if path.is_none() {
                    continue;
                }
                graph.edge_map.add(AbstractEdge {
                    level,
                    source: t1,
                    destination: t2,
                    edge_type: EdgeType::Intra,
                    weight: cost,
                })?;
            }
        }
    }

    debug!(
        nodes = graph.node_map.len(),
        edges = graph.edge_map.len(),
        clusters = (dimension.x * dimension.y),
        "built abstract graph"
    );
    Ok(graph)
}

/// Inserts a transient query-endpoint node at `tile` and returns the key
/// holding it alive.
///
/// When a non-ephemeral node already occupies the tile the insertion is a
/// no-op and the returned key is 0. Repeated insertions at the same tile
/// share one node; each returns a distinct key, and the node persists until
/// every key is removed again.
pub fn insert_ephemeral_node(
    tile_map: &TileMap,
    graph: &mut Graph,
    tile: MapCoordinate,
) -> Result<u64> {
    tile_map.get(tile)?;

    if let Some(n) = graph.node_map.get_mut(tile) {
        if !n.is_ephemeral() {
            return Ok(0);
        }
        let key = next_ephemeral_key();
        n.insert_ephemeral_key(key);
        return Ok(key);
    }

    let cluster = graph.cluster_map.cluster_containing(tile)?;
    let mut node = AbstractNode::new_ephemeral(
        graph.cluster_map.level(),
        cluster.coordinate(),
        tile,
    );
    let key = next_ephemeral_key();
    node.insert_ephemeral_key(key);
    graph.node_map.add(node);

    connect(tile_map, graph, tile)?;
    Ok(key)
}

/// Releases one key of the ephemeral node at `tile`. Dropping the last key
/// removes the node and every edge incident to it. Unknown tiles and
/// non-ephemeral nodes are no-ops.
pub fn remove_ephemeral_node(graph: &mut Graph, tile: MapCoordinate, key: u64) -> Result<()> {
    let Some(n) = graph.node_map.get_mut(tile) else {
        return Ok(());
    };
    if !n.is_ephemeral() {
        return Ok(());
    }
    if n.remove_ephemeral_key(key) {
        return Ok(());
    }

    graph.node_map.remove(tile);
    let dropped = graph.edge_map.remove_incident(tile);
    debug!(x = tile.x, y = tile.y, dropped, "reclaimed ephemeral node");
    Ok(())
}

// Joins the node at `tile` to the other abstract nodes of its cluster with
// INTRA edges weighted by the bounded shortest tile path. Ephemeral nodes do
// not connect to other ephemeral nodes: each represents an independent query.
fn connect(tile_map: &TileMap, graph: &mut Graph, tile: MapCoordinate) -> Result<()> {
    let node = graph
        .node_map
        .get(tile)
        .ok_or_else(|| Error::NotFound(format!("no abstract node at ({}, {})", tile.x, tile.y)))?;
    let self_ephemeral = node.is_ephemeral();
    let cluster = *graph.cluster_map.cluster_containing(tile)?;

    let mut candidates: Vec<MapCoordinate> = graph
        .node_map
        .get_by_cluster(&cluster)
        .iter()
        .filter(|n| n.tile_coordinate() != tile)
        .filter(|n| !(self_ephemeral && n.is_ephemeral()))
        .map(|n| n.tile_coordinate())
        .collect();
    candidates.sort();

    for other in candidates {
        if graph.edge_map.get(tile, other).is_some() {
            continue;
        }
        let (path, cost) = micro_astar::path(
            tile_map,
            tile,
            other,
            cluster.tile_boundary(),
            cluster.tile_dimension(),
        )?;
        if path.is_none() {
            continue;
        }
        graph.edge_map.add(AbstractEdge {
            level: graph.cluster_map.level(),
            source: tile,
            destination: other,
            edge_type: EdgeType::Intra,
            weight: cost,
        })?;
    }
    Ok(())
}
