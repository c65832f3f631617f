use crate::errors::{Error, Result};
use crate::models::{Direction, MapCoordinate, Orientation};
use crate::planner::cluster::{relative_direction, ClusterMap};
use crate::tile_map::TileMap;

// Runs of open border pairs at least this wide get a transition at each
// endpoint instead of a single representative in the middle.
const WIDE_ENTRANCE_LENGTH: i32 = 4;

/// An unordered pair of tiles, one per cluster, forming a crossable border
/// link between two adjacent clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub n1: MapCoordinate,
    pub n2: MapCoordinate,
}

/// A one-tile-thick run of border coordinates on a single cluster's edge.
/// HORIZONTAL slices extend in +X from `start`, VERTICAL slices in +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateSlice {
    pub orientation: Orientation,
    pub start: MapCoordinate,
    pub length: i32,
}

/// The border slice of the cluster at `c` on the side facing `d`.
pub fn build_cluster_edge_coordinate_slice(
    cluster_map: &ClusterMap,
    c: MapCoordinate,
    d: Direction,
) -> Result<CoordinateSlice> {
    let cluster = cluster_map.get(c)?;
    let b = cluster.tile_boundary();
    let dim = cluster.tile_dimension();

    let (orientation, start, length) = match d {
        Direction::North => (
            Orientation::Horizontal,
            MapCoordinate::new(b.x, b.y + dim.y - 1),
            dim.x,
        ),
        Direction::South => (Orientation::Horizontal, b, dim.x),
        Direction::East => (
            Orientation::Vertical,
            MapCoordinate::new(b.x + dim.x - 1, b.y),
            dim.y,
        ),
        Direction::West => (Orientation::Vertical, b, dim.y),
    };
    Ok(CoordinateSlice { orientation, start, length })
}

/// The coordinate at `offset` along the slice.
pub fn coordinate_at(s: &CoordinateSlice, offset: i32) -> Result<MapCoordinate> {
    if offset < 0 || offset >= s.length {
        return Err(Error::FailedPrecondition(format!(
            "offset {} lies outside a slice of length {}",
            offset, s.length
        )));
    }
    Ok(match s.orientation {
        Orientation::Horizontal => MapCoordinate::new(s.start.x + offset, s.start.y),
        Orientation::Vertical => MapCoordinate::new(s.start.x, s.start.y + offset),
    })
}

/// Whether the slice covers the given coordinate.
pub fn slice_contains(s: &CoordinateSlice, c: MapCoordinate) -> bool {
    match s.orientation {
        Orientation::Horizontal => {
            c.y == s.start.y && c.x >= s.start.x && c.x < s.start.x + s.length
        }
        Orientation::Vertical => {
            c.x == s.start.x && c.y >= s.start.y && c.y < s.start.y + s.length
        }
    }
}

// Two slices describe a shared border only when they have the same extent and
// orientation, sit on adjacent rows/columns, and are aligned along the border.
fn verify_coordinate_slices(s1: &CoordinateSlice, s2: &CoordinateSlice) -> Result<()> {
    if s1.length != s2.length {
        return Err(Error::FailedPrecondition(
            "mismatched slice lengths".to_string(),
        ));
    }
    if s1.orientation != s2.orientation {
        return Err(Error::FailedPrecondition(
            "mismatched slice orientations".to_string(),
        ));
    }

    let (aligned, adjacent) = match s1.orientation {
        Orientation::Horizontal => (
            s1.start.x == s2.start.x,
            (s1.start.y - s2.start.y).abs() == 1,
        ),
        Orientation::Vertical => (
            s1.start.y == s2.start.y,
            (s1.start.x - s2.start.x).abs() == 1,
        ),
    };
    if !adjacent {
        return Err(Error::FailedPrecondition(
            "slices are not adjacent".to_string(),
        ));
    }
    if !aligned {
        return Err(Error::FailedPrecondition(
            "slices are not aligned".to_string(),
        ));
    }
    Ok(())
}

// Emits transitions for a fully open slice pair: narrow entrances get a
// single representative in the middle, wide entrances one at each wall.
fn build_transitions_from_open_coordinate_slice(
    s1: &CoordinateSlice,
    s2: &CoordinateSlice,
) -> Result<Vec<Transition>> {
    let offsets = if s1.length >= WIDE_ENTRANCE_LENGTH {
        vec![0, s1.length - 1]
    } else {
        vec![s1.length / 2]
    };

    let mut transitions = Vec::with_capacity(offsets.len());
    for o in offsets {
        transitions.push(Transition {
            n1: coordinate_at(s1, o)?,
            n2: coordinate_at(s2, o)?,
        });
    }
    Ok(transitions)
}

// Walks the verified slice pair in lockstep, partitioning it into maximal
// runs where both tiles are passable, and emits transitions per run.
fn build_transitions_aux(
    tile_map: &TileMap,
    s1: &CoordinateSlice,
    s2: &CoordinateSlice,
) -> Result<Vec<Transition>> {
    verify_coordinate_slices(s1, s2)?;

    let sub_slice = |base: &CoordinateSlice, start_offset: i32, length: i32| -> Result<CoordinateSlice> {
        Ok(CoordinateSlice {
            orientation: base.orientation,
            start: coordinate_at(base, start_offset)?,
            length,
        })
    };

    let mut transitions = Vec::new();
    let mut run_start: Option<i32> = None;
    for offset in 0..=s1.length {
        let open = if offset < s1.length {
            tile_map.passable(coordinate_at(s1, offset)?)
                && tile_map.passable(coordinate_at(s2, offset)?)
        } else {
            false
        };

        match (open, run_start) {
            (true, None) => run_start = Some(offset),
            (false, Some(start)) => {
                let r1 = sub_slice(s1, start, offset - start)?;
                let r2 = sub_slice(s2, start, offset - start)?;
                transitions.extend(build_transitions_from_open_coordinate_slice(&r1, &r2)?);
                run_start = None;
            }
            _ => {}
        }
    }
    Ok(transitions)
}

/// Produces the transitions crossing the shared border of two adjacent
/// clusters, one tile pair per entrance representative.
pub fn build_transitions(
    tile_map: &TileMap,
    cluster_map: &ClusterMap,
    c1: MapCoordinate,
    c2: MapCoordinate,
) -> Result<Vec<Transition>> {
    let d1 = relative_direction(cluster_map.get(c1)?, cluster_map.get(c2)?)?;
    let s1 = build_cluster_edge_coordinate_slice(cluster_map, c1, d1)?;
    let s2 = build_cluster_edge_coordinate_slice(cluster_map, c2, d1.opposite())?;
    build_transitions_aux(tile_map, &s1, &s2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, TerrainType, TileData, TileMapData};

    fn open_map(w: i32, h: i32) -> TileMap {
        let mut tiles = Vec::new();
        for x in 0..w {
            for y in 0..h {
                tiles.push(TileData {
                    coordinate: Coordinate { x, y },
                    terrain_type: TerrainType::Plains,
                });
            }
        }
        TileMap::import(&TileMapData {
            dimension: Coordinate { x: w, y: h },
            tiles,
            terrain_costs: vec![],
        })
        .unwrap()
    }

    fn slice(orientation: Orientation, x: i32, y: i32, length: i32) -> CoordinateSlice {
        CoordinateSlice { orientation, start: MapCoordinate::new(x, y), length }
    }

    #[test]
    fn edge_slices_anchor_per_direction() {
        // 4x4 map cut into 2x2 clusters; the embedded cluster is (1, 1).
        let cm = ClusterMap::build(
            MapCoordinate::new(4, 4),
            MapCoordinate::new(2, 2),
            1,
        )
        .unwrap();
        let c = MapCoordinate::new(1, 1);

        let cases = [
            (Direction::North, slice(Orientation::Horizontal, 2, 3, 2)),
            (Direction::South, slice(Orientation::Horizontal, 2, 2, 2)),
            (Direction::East, slice(Orientation::Vertical, 3, 2, 2)),
            (Direction::West, slice(Orientation::Vertical, 2, 2, 2)),
        ];
        for (d, want) in cases {
            assert_eq!(
                build_cluster_edge_coordinate_slice(&cm, c, d).unwrap(),
                want,
                "direction {d:?}"
            );
        }
    }

    #[test]
    fn edge_slice_for_missing_cluster_fails() {
        let cm = ClusterMap::build(
            MapCoordinate::new(2, 2),
            MapCoordinate::new(2, 2),
            1,
        )
        .unwrap();
        assert!(build_cluster_edge_coordinate_slice(
            &cm,
            MapCoordinate::new(1, 0),
            Direction::North
        )
        .is_err());
    }

    #[test]
    fn coordinate_at_rejects_out_of_slice_offsets() {
        let s = slice(Orientation::Horizontal, 0, 0, 1);
        assert!(coordinate_at(&s, -1).is_err());
        assert!(coordinate_at(&s, 1).is_err());
        assert_eq!(coordinate_at(&s, 0).unwrap(), MapCoordinate::new(0, 0));
    }

    #[test]
    fn slice_contains_respects_orientation() {
        let h = slice(Orientation::Horizontal, 0, 0, 2);
        assert!(slice_contains(&h, MapCoordinate::new(1, 0)));
        assert!(!slice_contains(&h, MapCoordinate::new(0, 1)));
        assert!(!slice_contains(&h, MapCoordinate::new(2, 0)));

        let v = slice(Orientation::Vertical, 0, 0, 2);
        assert!(slice_contains(&v, MapCoordinate::new(0, 1)));
        assert!(!slice_contains(&v, MapCoordinate::new(1, 0)));
    }

    #[test]
    fn verify_rejects_malformed_slice_pairs() {
        let cases = [
            // mismatched lengths
            (
                slice(Orientation::Horizontal, 0, 0, 1),
                slice(Orientation::Horizontal, 0, 1, 2),
            ),
            // mismatched orientations
            (
                slice(Orientation::Horizontal, 0, 0, 1),
                slice(Orientation::Vertical, 0, 0, 1),
            ),
            // not adjacent
            (
                slice(Orientation::Horizontal, 0, 0, 1),
                slice(Orientation::Horizontal, 0, 2, 1),
            ),
            // adjacent but misaligned
            (
                slice(Orientation::Vertical, 0, 0, 2),
                slice(Orientation::Vertical, 1, 1, 2),
            ),
        ];
        for (s1, s2) in cases {
            assert!(verify_coordinate_slices(&s1, &s2).is_err(), "{s1:?} vs {s2:?}");
        }
    }

    #[test]
    fn narrow_runs_emit_one_middle_transition() {
        let m = open_map(2, 3);
        let s1 = slice(Orientation::Vertical, 0, 0, 3);
        let s2 = slice(Orientation::Vertical, 1, 0, 3);
        assert_eq!(
            build_transitions_aux(&m, &s1, &s2).unwrap(),
            vec![Transition {
                n1: MapCoordinate::new(0, 1),
                n2: MapCoordinate::new(1, 1),
            }]
        );
    }

    #[test]
    fn wide_runs_emit_transitions_at_both_endpoints() {
        let m = open_map(4, 2);
        let s1 = slice(Orientation::Horizontal, 0, 0, 4);
        let s2 = slice(Orientation::Horizontal, 0, 1, 4);
        assert_eq!(
            build_transitions_aux(&m, &s1, &s2).unwrap(),
            vec![
                Transition { n1: MapCoordinate::new(0, 0), n2: MapCoordinate::new(0, 1) },
                Transition { n1: MapCoordinate::new(3, 0), n2: MapCoordinate::new(3, 1) },
            ]
        );
    }
}
