use serde::{Deserialize, Serialize};

/// Wire-form 2-D coordinate as it appears in schema messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// Compact value-typed form of [`Coordinate`] used as a hash key.
///
/// Keys compare by component equality; the `Ord` impl orders by `(x, y)` and
/// is relied on for deterministic tie-breaks and canonical edge storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapCoordinate {
    pub x: i32,
    pub y: i32,
}

impl MapCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: MapCoordinate) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<Coordinate> for MapCoordinate {
    fn from(c: Coordinate) -> Self {
        Self { x: c.x, y: c.y }
    }
}

impl From<MapCoordinate> for Coordinate {
    fn from(c: MapCoordinate) -> Self {
        Self { x: c.x, y: c.y }
    }
}

/// Continuous 2-D position tracked by entity curves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center position of the given tile.
    pub fn from_tile(c: MapCoordinate) -> Self {
        Self { x: c.x as f64, y: c.y as f64 }
    }

    /// Nearest tile to this position.
    pub fn to_tile(self) -> MapCoordinate {
        MapCoordinate { x: self.x.round() as i32, y: self.y.round() as i32 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Unknown,
    Plains,
    Blocked,
}

/// Cardinal direction between adjacent clusters. +Y is NORTH, +X is EAST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// Axis along which a border slice extends: HORIZONTAL slices grow in +X,
/// VERTICAL slices grow in +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Pre-parsed schema message for a single tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileData {
    pub coordinate: Coordinate,
    pub terrain_type: TerrainType,
}

/// Pre-parsed schema message mapping a terrain type to its traversal cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainCostData {
    pub terrain_type: TerrainType,
    pub cost: f64,
}

/// Pre-parsed schema message for a tile map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMapData {
    pub dimension: Coordinate,
    pub tiles: Vec<TileData>,
    #[serde(default)]
    pub terrain_costs: Vec<TerrainCostData>,
}

/// Pre-parsed schema message for a cluster map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterMapData {
    pub tile_dimension: Coordinate,
    pub tile_map_dimension: Coordinate,
    #[serde(default = "default_level")]
    pub level: i32,
}

fn default_level() -> i32 {
    1
}
