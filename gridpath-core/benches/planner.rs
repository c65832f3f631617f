use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use gridpath_core::models::{Coordinate, MapCoordinate, TerrainCostData, TerrainType, TileData, TileMapData};
use gridpath_core::{build_graph, find_path, TileMap};

// 48x48 map with a sparse deterministic wall pattern.
fn bench_map() -> TileMap {
    let (w, h) = (48, 48);
    let mut tiles = Vec::new();
    for x in 0..w {
        for y in 0..h {
            let walled = x % 7 == 3 && y % 5 != 2;
            tiles.push(TileData {
                coordinate: Coordinate { x, y },
                terrain_type: if walled { TerrainType::Blocked } else { TerrainType::Plains },
            });
        }
    }
    TileMap::import(&TileMapData {
        dimension: Coordinate { x: w, y: h },
        tiles,
        terrain_costs: vec![TerrainCostData {
            terrain_type: TerrainType::Blocked,
            cost: f64::INFINITY,
        }],
    })
    .expect("bench map imports")
}

fn bench_build_graph(c: &mut Criterion) {
    let tm = bench_map();
    c.bench_function("build_graph_48x48_c8", |b| {
        b.iter(|| build_graph(black_box(&tm), MapCoordinate::new(8, 8), 1).expect("builds"))
    });
}

fn bench_find_path(c: &mut Criterion) {
    let tm = bench_map();
    let mut g = build_graph(&tm, MapCoordinate::new(8, 8), 1).expect("builds");
    c.bench_function("find_path_corner_to_corner", |b| {
        b.iter(|| {
            find_path(
                black_box(&tm),
                &mut g,
                MapCoordinate::new(0, 0),
                MapCoordinate::new(47, 47),
            )
            .expect("plans")
        })
    });
}

criterion_group!(benches, bench_build_graph, bench_find_path);
criterion_main!(benches);
