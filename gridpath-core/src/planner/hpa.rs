use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::errors::{Error, Result};
use crate::models::MapCoordinate;
use crate::planner::edge::EdgeType;
use crate::planner::graph::{insert_ephemeral_node, remove_ephemeral_node, Graph};
use crate::planner::micro_astar;
use crate::tile_map::TileMap;

#[derive(Copy, Clone, Debug)]
struct State {
    f: f64,
    g: f64,
    coordinate: MapCoordinate,
    seq: u64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed tuple compare for min-heap pops; seq keeps ties stable.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.coordinate.cmp(&self.coordinate))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// A* over the abstract node graph; states are tile coordinates of abstract
// nodes, moves are the edges incident to them.
fn abstract_astar(
    graph: &Graph,
    src: MapCoordinate,
    dst: MapCoordinate,
) -> (Option<Vec<MapCoordinate>>, f64) {
    let h = |c: MapCoordinate| c.manhattan_distance(dst) as f64;

    let mut open = BinaryHeap::new();
    let mut came_from: FxHashMap<MapCoordinate, MapCoordinate> = FxHashMap::default();
    let mut g_score: FxHashMap<MapCoordinate, f64> = FxHashMap::default();
    let mut closed: FxHashSet<MapCoordinate> = FxHashSet::default();
    let mut seq: u64 = 0;

    g_score.insert(src, 0.0);
    open.push(State { f: h(src), g: 0.0, coordinate: src, seq });

    while let Some(current) = open.pop() {
        let cur = current.coordinate;
        if cur == dst {
            let mut nodes = Vec::new();
            let mut p = cur;
            nodes.push(p);
            while let Some(prev) = came_from.get(&p) {
                p = *prev;
                nodes.push(p);
            }
            nodes.reverse();
            return (Some(nodes), current.g);
        }
        if !closed.insert(cur) {
            continue;
        }

        for e in graph.edge_map.get_by_source(cur) {
            let next = e.destination;
            let tentative_g = current.g + e.weight;
            let best = g_score.get(&next).copied().unwrap_or(f64::INFINITY);
            if tentative_g < best {
                came_from.insert(next, cur);
                g_score.insert(next, tentative_g);
                seq = seq.wrapping_add(1);
                open.push(State { f: tentative_g + h(next), g: tentative_g, coordinate: next, seq });
            }
        }
    }
    (None, f64::INFINITY)
}

// Appends a refined segment, dropping the connecting tile shared with the
// tail of the accumulated path.
fn append_segment(acc: &mut Vec<MapCoordinate>, mut segment: Vec<MapCoordinate>) {
    if let (Some(last), Some(first)) = (acc.last(), segment.first()) {
        if last == first {
            segment.remove(0);
        }
    }
    acc.append(&mut segment);
}

// Expands one abstract hop into concrete tile steps: INTER edges are a
// single border crossing, INTRA edges re-run the bounded tile A* inside the
// cluster shared by both endpoints.
fn refine_edge(
    tile_map: &TileMap,
    graph: &Graph,
    a: MapCoordinate,
    b: MapCoordinate,
) -> Result<Vec<MapCoordinate>> {
    let edge = graph.edge_map.get(a, b).ok_or_else(|| {
        Error::Internal(format!(
            "abstract path references a missing edge ({}, {}) -> ({}, {})",
            a.x, a.y, b.x, b.y
        ))
    })?;

    match edge.edge_type {
        EdgeType::Inter => Ok(vec![a, b]),
        EdgeType::Intra => {
            let cluster = graph.cluster_map.cluster_containing(a)?;
            let (tiles, _) = micro_astar::path(
                tile_map,
                a,
                b,
                cluster.tile_boundary(),
                cluster.tile_dimension(),
            )?;
            tiles.ok_or_else(|| {
                Error::Internal(format!(
                    "intra edge ({}, {}) -> ({}, {}) no longer refines to a tile path",
                    a.x, a.y, b.x, b.y
                ))
            })
        }
    }
}

fn plan(
    tile_map: &TileMap,
    graph: &Graph,
    src: MapCoordinate,
    dst: MapCoordinate,
) -> Result<(Option<Vec<MapCoordinate>>, f64)> {
    let (nodes, cost) = abstract_astar(graph, src, dst);
    let Some(nodes) = nodes else {
        return Ok((None, f64::INFINITY));
    };

    let mut tiles: Vec<MapCoordinate> = vec![src];
    for win in nodes.windows(2) {
        let segment = refine_edge(tile_map, graph, win[0], win[1])?;
        append_segment(&mut tiles, segment);
    }
    Ok((Some(tiles), cost))
}

/// Hierarchical path query between two tiles.
///
/// Ephemeral source and goal nodes scope the abstract graph to this request:
/// they are inserted before the abstract search and removed again before
/// returning, on success and on failure alike. Infeasible routes are
/// reported as `(None, +inf)`; only out-of-map endpoints are errors.
pub fn find_path(
    tile_map: &TileMap,
    graph: &mut Graph,
    src: MapCoordinate,
    dst: MapCoordinate,
) -> Result<(Option<Vec<MapCoordinate>>, f64)> {
    tile_map.get(src)?;
    tile_map.get(dst)?;

    if !tile_map.passable(src) || !tile_map.passable(dst) {
        return Ok((None, f64::INFINITY));
    }
    if src == dst {
        return Ok((Some(vec![src]), 0.0));
    }

    // Fast path: endpoints sharing a cluster often resolve without touching
    // the abstract graph at all. Falls through on failure, since a route may
    // still exist through neighboring clusters.
    let src_cluster = *graph.cluster_map.cluster_containing(src)?;
    if src_cluster.contains(dst) {
        let (tiles, cost) = micro_astar::path(
            tile_map,
            src,
            dst,
            src_cluster.tile_boundary(),
            src_cluster.tile_dimension(),
        )?;
        if tiles.is_some() {
            return Ok((tiles, cost));
        }
    }

    let src_key = insert_ephemeral_node(tile_map, graph, src)?;
    let dst_key = match insert_ephemeral_node(tile_map, graph, dst) {
        Ok(k) => k,
        Err(e) => {
            remove_ephemeral_node(graph, src, src_key)?;
            return Err(e);
        }
    };

    let result = plan(tile_map, graph, src, dst);

    remove_ephemeral_node(graph, dst, dst_key)?;
    remove_ephemeral_node(graph, src, src_key)?;

    if let Ok((Some(tiles), cost)) = &result {
        trace!(
            sx = src.x, sy = src.y, dx = dst.x, dy = dst.y,
            len = tiles.len(), cost = *cost,
            "refined hierarchical path"
        );
    }
    result
}
