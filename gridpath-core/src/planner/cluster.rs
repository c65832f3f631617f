use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};
use crate::models::{ClusterMapData, Direction, MapCoordinate};

/// Axis-aligned rectangular group of tiles.
///
/// A cluster covers `[x0, x0+dx) x [y0, y0+dy)`. The last cluster row or
/// column of a map may be smaller when the tile map does not divide evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    coordinate: MapCoordinate,
    tile_boundary: MapCoordinate,
    tile_dimension: MapCoordinate,
}

impl Cluster {
    pub fn coordinate(&self) -> MapCoordinate {
        self.coordinate
    }

    pub fn tile_boundary(&self) -> MapCoordinate {
        self.tile_boundary
    }

    pub fn tile_dimension(&self) -> MapCoordinate {
        self.tile_dimension
    }

    pub fn contains(&self, tile: MapCoordinate) -> bool {
        tile.x >= self.tile_boundary.x
            && tile.x < self.tile_boundary.x + self.tile_dimension.x
            && tile.y >= self.tile_boundary.y
            && tile.y < self.tile_boundary.y + self.tile_dimension.y
    }

    /// Whether the tile lies on the cluster's perimeter ring.
    pub fn on_perimeter(&self, tile: MapCoordinate) -> bool {
        self.contains(tile)
            && (tile.x == self.tile_boundary.x
                || tile.x == self.tile_boundary.x + self.tile_dimension.x - 1
                || tile.y == self.tile_boundary.y
                || tile.y == self.tile_boundary.y + self.tile_dimension.y - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PartitionInfo {
    tile_boundary: i32,
    tile_dimension: i32,
}

// The k-th partition covers [k*d, min((k+1)*d, w)).
fn partition(tile_map_dimension: i32, tile_dimension: i32) -> Result<Vec<PartitionInfo>> {
    if tile_dimension <= 0 {
        return Err(Error::FailedPrecondition(format!(
            "invalid tile dimension value {tile_dimension}"
        )));
    }

    let mut partitions = Vec::new();
    let mut k = 0;
    while k * tile_dimension < tile_map_dimension {
        let min = k * tile_dimension;
        let max = ((k + 1) * tile_dimension).min(tile_map_dimension) - 1;
        partitions.push(PartitionInfo { tile_boundary: min, tile_dimension: max - min + 1 });
        k += 1;
    }
    Ok(partitions)
}

/// Partition of a tile map into fixed-size rectangular clusters.
///
/// Invariant: the cluster rectangles cover the tile map exactly once.
#[derive(Debug, Clone)]
pub struct ClusterMap {
    level: i32,
    dimension: MapCoordinate,
    tile_dimension: MapCoordinate,
    tile_map_dimension: MapCoordinate,
    clusters: FxHashMap<MapCoordinate, Cluster>,
}

impl ClusterMap {
    /// Partitions a `tile_map_dimension`-sized map into `tile_dimension`
    /// clusters at the given level.
    ///
    /// A zero-extent map yields an empty cluster set with dimension (0, 0);
    /// a zero cluster dimension or a level below 1 is a precondition failure.
    pub fn build(
        tile_map_dimension: MapCoordinate,
        tile_dimension: MapCoordinate,
        level: i32,
    ) -> Result<ClusterMap> {
        if level < 1 {
            return Err(Error::FailedPrecondition(
                "cluster level must be a non-zero positive integer".to_string(),
            ));
        }

        let x_partitions = partition(tile_map_dimension.x, tile_dimension.x)?;
        let y_partitions = partition(tile_map_dimension.y, tile_dimension.y)?;

        let mut m = ClusterMap {
            level,
            dimension: MapCoordinate::new(0, 0),
            tile_dimension,
            tile_map_dimension,
            clusters: FxHashMap::default(),
        };
        if x_partitions.is_empty() || y_partitions.is_empty() {
            return Ok(m);
        }

        m.dimension = MapCoordinate::new(x_partitions.len() as i32, y_partitions.len() as i32);
        for xp in &x_partitions {
            let x = xp.tile_boundary / tile_dimension.x;
            for yp in &y_partitions {
                let y = yp.tile_boundary / tile_dimension.y;
                let coordinate = MapCoordinate::new(x, y);
                m.clusters.insert(
                    coordinate,
                    Cluster {
                        coordinate,
                        tile_boundary: MapCoordinate::new(xp.tile_boundary, yp.tile_boundary),
                        tile_dimension: MapCoordinate::new(xp.tile_dimension, yp.tile_dimension),
                    },
                );
            }
        }
        Ok(m)
    }

    /// Adopts a pre-parsed schema message. The cluster table is always
    /// constructed explicitly here via [`ClusterMap::build`].
    pub fn import(data: &ClusterMapData) -> Result<ClusterMap> {
        ClusterMap::build(
            MapCoordinate::from(data.tile_map_dimension),
            MapCoordinate::from(data.tile_dimension),
            data.level,
        )
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Cluster-space dimension (Cx, Cy).
    pub fn dimension(&self) -> MapCoordinate {
        self.dimension
    }

    pub fn tile_dimension(&self) -> MapCoordinate {
        self.tile_dimension
    }

    pub fn tile_map_dimension(&self) -> MapCoordinate {
        self.tile_map_dimension
    }

    pub fn get(&self, c: MapCoordinate) -> Result<&Cluster> {
        self.clusters.get(&c).ok_or_else(|| {
            Error::NotFound(format!("no cluster at ({}, {})", c.x, c.y))
        })
    }

    /// Existing clusters at the four cardinal offsets of `c`.
    pub fn neighbors(&self, c: MapCoordinate) -> Result<Vec<&Cluster>> {
        self.get(c)?;
        Ok(crate::tile_map::NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| {
                self.clusters.get(&MapCoordinate::new(c.x + dx, c.y + dy))
            })
            .collect())
    }

    /// The cluster whose rectangle contains the given tile.
    pub fn cluster_containing(&self, tile: MapCoordinate) -> Result<&Cluster> {
        if tile.x < 0
            || tile.x >= self.tile_map_dimension.x
            || tile.y < 0
            || tile.y >= self.tile_map_dimension.y
        {
            return Err(Error::NotFound(format!(
                "tile ({}, {}) lies outside the cluster map",
                tile.x, tile.y
            )));
        }
        self.get(MapCoordinate::new(
            tile.x / self.tile_dimension.x,
            tile.y / self.tile_dimension.y,
        ))
    }
}

/// Whether two clusters share a border, i.e. their cluster coordinates are
/// at Manhattan distance exactly 1.
pub fn is_adjacent(c1: &Cluster, c2: &Cluster) -> bool {
    c1.coordinate().manhattan_distance(c2.coordinate()) == 1
}

/// Direction of `c2` as seen from `c1`. Convention: +Y is NORTH, +X is EAST.
pub fn relative_direction(c1: &Cluster, c2: &Cluster) -> Result<Direction> {
    let (a, b) = (c1.coordinate(), c2.coordinate());
    match (b.x - a.x, b.y - a.y) {
        (0, 1) => Ok(Direction::North),
        (0, -1) => Ok(Direction::South),
        (1, 0) => Ok(Direction::East),
        (-1, 0) => Ok(Direction::West),
        _ => Err(Error::FailedPrecondition(format!(
            "clusters ({}, {}) and ({}, {}) are not adjacent",
            a.x, a.y, b.x, b.y
        ))),
    }
}
