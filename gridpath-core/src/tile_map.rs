use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::{MapCoordinate, TerrainType, TileMapData};

/// Fallback traversal cost for terrain types without an explicit entry.
const DEFAULT_TERRAIN_COST: f64 = 1.0;

/// Offsets of the four cardinal neighbors, in a fixed order (N, S, E, W).
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A single grid cell. Tiles are immutable after import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    coordinate: MapCoordinate,
    terrain_type: TerrainType,
}

impl Tile {
    pub fn coordinate(&self) -> MapCoordinate {
        self.coordinate
    }

    pub fn terrain_type(&self) -> TerrainType {
        self.terrain_type
    }
}

/// Immutable grid of tiles with a terrain cost table.
///
/// Invariant: every coordinate in `[0, W) x [0, H)` holds exactly one tile.
#[derive(Debug, Clone)]
pub struct TileMap {
    dimension: MapCoordinate,
    tiles: FxHashMap<MapCoordinate, Tile>,
    costs: FxHashMap<TerrainType, f64>,
}

impl TileMap {
    /// Adopts a pre-parsed schema message into the in-memory model.
    pub fn import(data: &TileMapData) -> Result<TileMap> {
        let dimension = MapCoordinate::from(data.dimension);
        if dimension.x < 0 || dimension.y < 0 {
            return Err(Error::FailedPrecondition(format!(
                "tile map dimension ({}, {}) must be non-negative",
                dimension.x, dimension.y
            )));
        }

        let expected = dimension.x as usize * dimension.y as usize;
        let mut tiles = FxHashMap::default();
        tiles.reserve(expected);
        for t in &data.tiles {
            let c = MapCoordinate::from(t.coordinate);
            if c.x < 0 || c.x >= dimension.x || c.y < 0 || c.y >= dimension.y {
                return Err(Error::FailedPrecondition(format!(
                    "tile ({}, {}) lies outside the map dimension",
                    c.x, c.y
                )));
            }
            if tiles
                .insert(c, Tile { coordinate: c, terrain_type: t.terrain_type })
                .is_some()
            {
                return Err(Error::FailedPrecondition(format!(
                    "duplicate tile at ({}, {})",
                    c.x, c.y
                )));
            }
        }
        if tiles.len() != expected {
            return Err(Error::FailedPrecondition(format!(
                "tile map dimension expects {} tiles, got {}",
                expected,
                tiles.len()
            )));
        }

        let costs = data
            .terrain_costs
            .iter()
            .map(|tc| (tc.terrain_type, tc.cost))
            .collect();

        debug!(w = dimension.x, h = dimension.y, "imported tile map");
        Ok(TileMap { dimension, tiles, costs })
    }

    pub fn dimension(&self) -> MapCoordinate {
        self.dimension
    }

    pub fn contains(&self, c: MapCoordinate) -> bool {
        c.x >= 0 && c.x < self.dimension.x && c.y >= 0 && c.y < self.dimension.y
    }

    pub fn get(&self, c: MapCoordinate) -> Result<&Tile> {
        self.tiles.get(&c).ok_or_else(|| {
            Error::NotFound(format!("no tile at ({}, {})", c.x, c.y))
        })
    }

    /// The four cardinal neighbors inside the map bounds.
    pub fn neighbors(&self, c: MapCoordinate) -> Result<Vec<&Tile>> {
        // Ensure the anchor itself is valid before enumerating around it.
        self.get(c)?;

        Ok(NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| {
                self.tiles.get(&MapCoordinate::new(c.x + dx, c.y + dy))
            })
            .collect())
    }

    /// Traversal cost of a terrain type. Missing entries default to 1, except
    /// BLOCKED which defaults to +inf.
    pub fn cost(&self, terrain: TerrainType) -> f64 {
        match self.costs.get(&terrain) {
            Some(c) => *c,
            None if terrain == TerrainType::Blocked => f64::INFINITY,
            None => DEFAULT_TERRAIN_COST,
        }
    }

    /// Cost of entering the tile at `c`; +inf when the tile does not exist.
    pub fn tile_cost(&self, c: MapCoordinate) -> f64 {
        match self.tiles.get(&c) {
            Some(t) => self.cost(t.terrain_type),
            None => f64::INFINITY,
        }
    }

    /// A tile is passable when it exists and has finite cost. Infinite-cost
    /// tiles are impassable as either source or destination.
    pub fn passable(&self, c: MapCoordinate) -> bool {
        self.tile_cost(c).is_finite()
    }
}
