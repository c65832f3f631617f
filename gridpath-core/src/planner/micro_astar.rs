use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{Error, Result};
use crate::models::MapCoordinate;
use crate::tile_map::{TileMap, NEIGHBOR_OFFSETS};

#[derive(Copy, Clone, Debug)]
struct State {
    // f = g + h
    f: f64,
    g: f64,
    coordinate: MapCoordinate,
    // Monotonic increasing sequence to keep pop order deterministic
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
        // Reverse for min-heap behavior in BinaryHeap (which is a max-heap).
        // Compare f asc, then g asc, then x asc, then y asc, then seq asc.
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

fn manhattan(a: MapCoordinate, b: MapCoordinate) -> f64 {
    a.manhattan_distance(b) as f64
}

fn in_rectangle(c: MapCoordinate, boundary: MapCoordinate, dimension: MapCoordinate) -> bool {
    c.x >= boundary.x
        && c.x < boundary.x + dimension.x
        && c.y >= boundary.y
        && c.y < boundary.y + dimension.y
}

/// A* over the tile map restricted to the rectangle
/// `[boundary, boundary + dimension)`; tiles outside are treated as absent.
///
/// Traversal cost is the destination tile's terrain cost, and infinite-cost
/// tiles are excluded from expansion. Returns `(None, +inf)` when either
/// endpoint is blocked or no path exists; an endpoint outside the rectangle
/// or outside the tile map is a `NotFound` error.
pub fn path(
    tile_map: &TileMap,
    src: MapCoordinate,
    dst: MapCoordinate,
    boundary: MapCoordinate,
    dimension: MapCoordinate,
) -> Result<(Option<Vec<MapCoordinate>>, f64)> {
    for c in [src, dst] {
        if !in_rectangle(c, boundary, dimension) {
            return Err(Error::NotFound(format!(
                "coordinate ({}, {}) lies outside the search rectangle",
                c.x, c.y
            )));
        }
        tile_map.get(c)?;
    }

    if !tile_map.passable(src) || !tile_map.passable(dst) {
        return Ok((None, f64::INFINITY));
    }
    if src == dst {
        return Ok((Some(vec![src]), 0.0));
    }

    let mut open = BinaryHeap::new();
    let mut came_from: FxHashMap<MapCoordinate, MapCoordinate> = FxHashMap::default();
    let mut g_score: FxHashMap<MapCoordinate, f64> = FxHashMap::default();
    let mut closed: FxHashSet<MapCoordinate> = FxHashSet::default();
    let mut seq: u64 = 0;

    g_score.insert(src, 0.0);
    open.push(State { f: manhattan(src, dst), g: 0.0, coordinate: src, seq });

    while let Some(current) = open.pop() {
        let cur = current.coordinate;
        if cur == dst {
            let mut path = Vec::new();
            let mut p = cur;
            path.push(p);
            while let Some(prev) = came_from.get(&p) {
                p = *prev;
                path.push(p);
            }
            path.reverse();
            return Ok((Some(path), current.g));
        }

        // Stale heap entries are harmless; the first pop per coordinate wins
        // because tile costs are non-negative and the heuristic is consistent.
        if !closed.insert(cur) {
            continue;
        }

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let next = MapCoordinate::new(cur.x + dx, cur.y + dy);
            if !in_rectangle(next, boundary, dimension) {
                continue;
            }
            let step = tile_map.tile_cost(next);
            if !step.is_finite() {
                continue;
            }

            let tentative_g = current.g + step;
            let best = g_score.get(&next).copied().unwrap_or(f64::INFINITY);
            if tentative_g < best {
                came_from.insert(next, cur);
                g_score.insert(next, tentative_g);
                seq = seq.wrapping_add(1);
                open.push(State {
                    f: tentative_g + manhattan(next, dst),
                    g: tentative_g,
                    coordinate: next,
                    seq,
                });
            }
        }
    }

    Ok((None, f64::INFINITY))
}
