//! gridpath-sim: the tick-ordered action core of the game server.
//!
//! Entity state advances across discrete simulation ticks. Each pending
//! action owns a small finite state machine whose observable state is partly
//! derived: virtual transitions validate a projection (Pending looks like
//! Executing once its execution tick arrives) without committing it. The
//! move executor bridges Executing move actions to the hierarchical planner
//! in `gridpath-core` and writes the resulting waypoints into entity
//! position curves.

pub mod curve;
pub mod entity;
pub mod executor;
pub mod fsm;
pub mod instance;
pub mod move_action;
pub mod schedule;
pub mod status;

pub use status::{Status, Tick};
