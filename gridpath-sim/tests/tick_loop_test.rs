use std::sync::Arc;

use gridpath_core::models::{Coordinate, MapCoordinate, Position, TerrainCostData, TerrainType, TileData, TileMapData};
use gridpath_core::{build_graph, TileMap};
use gridpath_sim::entity::{Moveable, Unit};
use gridpath_sim::executor::{MoveExecutor, PARTIAL_MOVE_SEGMENT};
use gridpath_sim::fsm::commonstate;
use gridpath_sim::move_action::{Action, MoveType};
use gridpath_sim::schedule::Schedule;
use gridpath_sim::status::Status;

fn import(w: i32, h: i32, blocked: &[(i32, i32)]) -> TileMap {
    let mut tiles = Vec::new();
    for x in 0..w {
        for y in 0..h {
            let terrain_type = if blocked.contains(&(x, y)) {
                TerrainType::Blocked
            } else {
                TerrainType::Plains
            };
            tiles.push(TileData { coordinate: Coordinate { x, y }, terrain_type });
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
    .unwrap()
}

// Runs the single-threaded tick loop until the schedule drains or the tick
// budget runs out: visit every action in id order, prune, advance the clock.
fn run_loop(
    status: &Arc<Status>,
    tile_map: &TileMap,
    graph: &mut gridpath_core::Graph,
    schedule: &mut Schedule,
    max_ticks: u64,
) {
    for _ in 0..max_ticks {
        {
            let mut executor = MoveExecutor::new(Arc::clone(status), tile_map, graph);
            for action in schedule.iter() {
                executor.visit(action).unwrap();
            }
        }
        if schedule.prune() == 0 {
            return;
        }
        status.increment();
    }
    panic!("schedule did not drain within {max_ticks} ticks");
}

#[test]
fn long_move_is_split_and_completes() {
    let tm = import(6, 6, &[]);
    let mut g = build_graph(&tm, MapCoordinate::new(3, 3), 1).unwrap();

    let status = Arc::new(Status::new(0));
    let unit = Arc::new(Unit::new(1, 0, Position::new(0.0, 0.0)));
    let action = Arc::new(Action::new(
        Arc::clone(&unit) as Arc<dyn Moveable>,
        Arc::clone(&status),
        Position::new(5.0, 5.0),
        MoveType::Default,
    ));

    let mut schedule = Schedule::new();
    schedule.add(Arc::clone(&action));

    // First planning pass commits one segment and re-arms the remainder.
    {
        let mut executor = MoveExecutor::new(Arc::clone(&status), &tm, &mut g);
        executor.visit(&action).unwrap();
    }
    assert_eq!(action.execution_tick(), PARTIAL_MOVE_SEGMENT as u64);
    assert_eq!(action.state().unwrap(), commonstate::PENDING);

    run_loop(&status, &tm, &mut g, &mut schedule, 32);

    assert_eq!(action.state().unwrap(), commonstate::FINISHED);
    assert_eq!(unit.position(status.tick()), Position::new(5.0, 5.0));
    // The walk advanced one tile per tick: ten steps for a cost-10 route,
    // landing on a whole tile mid-walk rather than an interpolated point.
    assert_eq!(status.tick(), 10);
    let mid = unit.position(5);
    assert_eq!(mid.x.fract(), 0.0);
    assert_eq!(mid.y.fract(), 0.0);
    assert_eq!(mid.to_tile().manhattan_distance(MapCoordinate::new(0, 0)), 5);
}

#[test]
fn short_move_completes_without_splitting() {
    let tm = import(6, 6, &[]);
    let mut g = build_graph(&tm, MapCoordinate::new(3, 3), 1).unwrap();

    let status = Arc::new(Status::new(0));
    let unit = Arc::new(Unit::new(2, 0, Position::new(0.0, 0.0)));
    let action = Arc::new(Action::new(
        Arc::clone(&unit) as Arc<dyn Moveable>,
        Arc::clone(&status),
        Position::new(2.0, 1.0),
        MoveType::Default,
    ));

    let mut schedule = Schedule::new();
    schedule.add(Arc::clone(&action));
    run_loop(&status, &tm, &mut g, &mut schedule, 16);

    assert_eq!(action.state().unwrap(), commonstate::FINISHED);
    assert_eq!(action.execution_tick(), 0, "short moves are never re-armed");
    assert_eq!(unit.position(status.tick()), Position::new(2.0, 1.0));
}

#[test]
fn unreachable_destination_keeps_the_action_live() {
    // The destination is walled off; planning yields no route and the
    // action neither finishes nor errors.
    let tm = import(6, 6, &[(4, 4), (4, 5), (5, 4)]);
    let mut g = build_graph(&tm, MapCoordinate::new(3, 3), 1).unwrap();

    let status = Arc::new(Status::new(0));
    let unit = Arc::new(Unit::new(3, 0, Position::new(0.0, 0.0)));
    let action = Arc::new(Action::new(
        Arc::clone(&unit) as Arc<dyn Moveable>,
        Arc::clone(&status),
        Position::new(5.0, 5.0),
        MoveType::Default,
    ));

    {
        let mut executor = MoveExecutor::new(Arc::clone(&status), &tm, &mut g);
        executor.visit(&action).unwrap();
    }
    assert_eq!(action.state().unwrap(), commonstate::EXECUTING);
    assert_eq!(unit.position(0), Position::new(0.0, 0.0));
}

#[test]
fn canceled_action_stops_receiving_segments() {
    let tm = import(6, 6, &[]);
    let mut g = build_graph(&tm, MapCoordinate::new(3, 3), 1).unwrap();

    let status = Arc::new(Status::new(0));
    let unit = Arc::new(Unit::new(4, 0, Position::new(0.0, 0.0)));
    let action = Arc::new(Action::new(
        Arc::clone(&unit) as Arc<dyn Moveable>,
        Arc::clone(&status),
        Position::new(5.0, 5.0),
        MoveType::Default,
    ));

    action.cancel().unwrap();
    {
        let mut executor = MoveExecutor::new(Arc::clone(&status), &tm, &mut g);
        executor.visit(&action).unwrap();
    }
    // No waypoints were committed beyond the spawn datum.
    assert_eq!(unit.position(20), Position::new(0.0, 0.0));
    assert_eq!(action.state().unwrap(), commonstate::CANCELED);
}

#[test]
fn lifecycle_delete_is_monotonic() {
    let unit = Unit::new(5, 3, Position::new(0.0, 0.0));
    assert_eq!(unit.lifecycle().start(), 3);
    assert_eq!(unit.lifecycle().end(), None);

    unit.lifecycle().delete(10);
    unit.lifecycle().delete(7);
    assert_eq!(unit.lifecycle().end(), Some(10));
}
