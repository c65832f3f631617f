use std::sync::Arc;

use tracing::{debug, trace};

use gridpath_core::errors::Result;
use gridpath_core::models::Position;
use gridpath_core::planner::graph::Graph;
use gridpath_core::planner::hpa;
use gridpath_core::TileMap;

use crate::fsm::commonstate;
use crate::move_action::Action;
use crate::status::Status;

/// How many tiles of a route are committed per planning pass. Longer moves
/// are split: the remainder is re-planned when the scheduled tick arrives,
/// picking up map changes that happened in between.
pub const PARTIAL_MOVE_SEGMENT: usize = 8;

/// Advances Executing move actions by planning a route and writing waypoints
/// into the entity's position curve, one tile per tick.
pub struct MoveExecutor<'a> {
    status: Arc<Status>,
    tile_map: &'a TileMap,
    graph: &'a mut Graph,
}

impl<'a> MoveExecutor<'a> {
    pub fn new(status: Arc<Status>, tile_map: &'a TileMap, graph: &'a mut Graph) -> Self {
        MoveExecutor { status, tile_map, graph }
    }

    /// Visits one action for the current tick.
    ///
    /// Non-Executing actions are left untouched. An infeasible route is not
    /// an error: the action simply stays schedulable and may succeed later.
    pub fn visit(&mut self, action: &Action) -> Result<()> {
        if action.state()? != commonstate::EXECUTING {
            return Ok(());
        }

        let tick = self.status.tick();
        let src = action.entity().position(tick).to_tile();
        let dst = action.destination().to_tile();

        let (tiles, cost) = hpa::find_path(self.tile_map, self.graph, src, dst)?;
        let Some(tiles) = tiles else {
            trace!(id = action.id(), tick, "no route to destination");
            return Ok(());
        };

        let committed = tiles.len().min(PARTIAL_MOVE_SEGMENT + 1);
        let waypoints: Vec<(u64, Position)> = tiles[..committed]
            .iter()
            .enumerate()
            .map(|(i, c)| (tick + i as u64, Position::from_tile(*c)))
            .collect();
        action.entity().commit_waypoints(tick, &waypoints);

        if committed < tiles.len() {
            // The remainder re-enters Pending until the segment is walked.
            action.schedule_partial_move(tick + PARTIAL_MOVE_SEGMENT as u64);
        }

        debug!(
            id = action.id(),
            tick,
            cost,
            committed,
            remaining = tiles.len() - committed,
            "committed move segment"
        );
        Ok(())
    }
}
