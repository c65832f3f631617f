use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gridpath_core::models::Position;

use crate::curve::LinearCurve;
use crate::status::Tick;

pub type EntityId = u64;

/// The contract the move action requires of an entity: a stable identifier,
/// a tick-addressable position, and a way to commit planned waypoints.
pub trait Moveable: Send + Sync {
    fn id(&self) -> EntityId;

    fn position(&self, tick: Tick) -> Position;

    /// Replaces the position curve from `tick` onward with the given
    /// waypoints.
    fn commit_waypoints(&self, tick: Tick, waypoints: &[(Tick, Position)]);
}

#[derive(Debug)]
struct Window {
    start: Tick,
    end: Option<Tick>,
}

/// Creation and destruction ticks of an entity. The game state is
/// append-only: destroyed entities are marked, never dropped, so the end
/// tick only ever moves forward.
#[derive(Debug)]
pub struct Lifecycle {
    window: RwLock<Window>,
}

impl Lifecycle {
    pub fn new(start: Tick) -> Lifecycle {
        Lifecycle { window: RwLock::new(Window { start, end: None }) }
    }

    pub fn start(&self) -> Tick {
        self.read().start
    }

    pub fn end(&self) -> Option<Tick> {
        self.read().end
    }

    /// Marks the entity destroyed at `tick`. Monotonic: a later delete never
    /// rewinds an earlier one.
    pub fn delete(&self, tick: Tick) {
        let mut w = self.write();
        w.end = Some(w.end.map_or(tick, |e| e.max(tick)));
    }

    fn read(&self) -> RwLockReadGuard<'_, Window> {
        self.window.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Window> {
        self.window.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A moveable game entity: a lifecycle window plus a position curve.
#[derive(Debug)]
pub struct Unit {
    id: EntityId,
    lifecycle: Lifecycle,
    position: Mutex<LinearCurve>,
}

impl Unit {
    pub fn new(id: EntityId, tick: Tick, position: Position) -> Unit {
        let mut curve = LinearCurve::new();
        curve.add(tick, position);
        Unit { id, lifecycle: Lifecycle::new(tick), position: Mutex::new(curve) }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn curve(&self) -> MutexGuard<'_, LinearCurve> {
        self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Moveable for Unit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self, tick: Tick) -> Position {
        self.curve().get(tick)
    }

    fn commit_waypoints(&self, tick: Tick, waypoints: &[(Tick, Position)]) {
        self.curve().replace_tail(tick, waypoints);
    }
}
