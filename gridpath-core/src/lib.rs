//! gridpath-core: hierarchical path-finding over tile maps.
//!
//! Implements the HPA* pipeline: a tile map is partitioned into fixed-size
//! clusters, open border segments between adjacent clusters become
//! transitions, and transitions are lifted into an abstract graph of
//! weight-1 INTER edges and tile-A*-weighted INTRA edges. Path queries
//! insert ephemeral source/goal nodes into the abstract graph, search it,
//! and refine each abstract hop back into concrete tile steps.

pub mod errors;
pub mod models;
pub mod planner;
pub mod tile_map;

pub use errors::{Error, Result};
pub use models::{Coordinate, MapCoordinate, Position};
pub use planner::graph::{build_graph, Graph};
pub use planner::hpa::find_path;
pub use tile_map::TileMap;

/// Returns the crate version for basic linkage diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
