use indexmap::IndexMap;

use crate::errors::{Error, Result};
use crate::models::MapCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    /// Crosses a cluster border between paired border tiles; weight is the
    /// unit tile-traverse cost.
    Inter,
    /// Connects two abstract nodes inside the same cluster; weight is the
    /// cost of a shortest tile path between them restricted to that cluster.
    Intra,
}

/// A weighted edge of the abstract graph. Edges are undirected in semantics:
/// `(a -> b)` and `(b -> a)` always coexist with equal weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbstractEdge {
    pub level: i32,
    pub source: MapCoordinate,
    pub destination: MapCoordinate,
    pub edge_type: EdgeType,
    pub weight: f64,
}

impl AbstractEdge {
    pub fn reversed(&self) -> AbstractEdge {
        AbstractEdge { source: self.destination, destination: self.source, ..*self }
    }

    /// Equality up to endpoint swap; reversed edges describe the same link.
    pub fn equivalent(&self, other: &AbstractEdge) -> bool {
        *self == *other || *self == other.reversed()
    }
}

// Canonical storage key: endpoints ordered by (x, y).
fn canonical(a: MapCoordinate, b: MapCoordinate) -> (MapCoordinate, MapCoordinate) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Symmetric edge store: `get(a, b)` and `get(b, a)` resolve to the same
/// logical edge. Each edge is stored once in canonical direction and swapped
/// on return to match the queried orientation.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: IndexMap<(MapCoordinate, MapCoordinate), AbstractEdge>,
}

impl EdgeMap {
    pub fn new() -> EdgeMap {
        EdgeMap::default()
    }

    /// Inserts an edge; fails when either direction is already present.
    pub fn add(&mut self, e: AbstractEdge) -> Result<()> {
        let key = canonical(e.source, e.destination);
        if self.edges.contains_key(&key) {
            return Err(Error::AlreadyExists(format!(
                "edge ({}, {}) -> ({}, {}) is already present",
                e.source.x, e.source.y, e.destination.x, e.destination.y
            )));
        }
        let stored = if e.source <= e.destination { e } else { e.reversed() };
        self.edges.insert(key, stored);
        Ok(())
    }

    /// The stored edge regardless of direction, oriented from `a` to `b`.
    pub fn get(&self, a: MapCoordinate, b: MapCoordinate) -> Option<AbstractEdge> {
        self.edges.get(&canonical(a, b)).map(|e| {
            if e.source == a {
                *e
            } else {
                e.reversed()
            }
        })
    }

    /// Removes both directions of the edge between `a` and `b`.
    pub fn remove(&mut self, a: MapCoordinate, b: MapCoordinate) -> Option<AbstractEdge> {
        self.edges.shift_remove(&canonical(a, b))
    }

    /// All edges with `a` as one endpoint, oriented from `a`.
    pub fn get_by_source(&self, a: MapCoordinate) -> Vec<AbstractEdge> {
        self.edges
            .values()
            .filter_map(|e| {
                if e.source == a {
                    Some(*e)
                } else if e.destination == a {
                    Some(e.reversed())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Removes every edge incident to `a`; returns how many were dropped.
    pub fn remove_incident(&mut self, a: MapCoordinate) -> usize {
        let before = self.edges.len();
        self.edges.retain(|_, e| e.source != a && e.destination != a);
        before - self.edges.len()
    }

    /// Number of logical (undirected) edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates each logical edge once, in canonical direction.
    pub fn iter(&self) -> impl Iterator<Item = &AbstractEdge> {
        self.edges.values()
    }
}
