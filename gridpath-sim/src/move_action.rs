use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use gridpath_core::errors::Result;
use gridpath_core::models::Position;

use crate::entity::Moveable;
use crate::fsm::{commonstate, Fsm, FsmType, State, Transition};
use crate::instance::Instance;
use crate::status::{Status, Tick};

pub type ActionId = u64;

// Process-wide construction order. Actions competing for the same schedule
// slot share their entity-derived id, so precedence ties need an identifier
// that still distinguishes them.
static ACTION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Selects one of the two preregistered move FSMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    Default,
    Direct,
}

// Executing and Finished are projections of Pending and may only be observed
// virtually; cancellation is the sole real transition.
const TRANSITIONS: [Transition; 4] = [
    Transition { from: commonstate::PENDING, to: commonstate::EXECUTING, virtual_only: true },
    Transition { from: commonstate::PENDING, to: commonstate::CANCELED, virtual_only: false },
    Transition { from: commonstate::PENDING, to: commonstate::FINISHED, virtual_only: true },
    Transition { from: commonstate::EXECUTING, to: commonstate::CANCELED, virtual_only: false },
];

static MOVE_FSM: LazyLock<Arc<Fsm>> =
    LazyLock::new(|| Arc::new(Fsm::new(&TRANSITIONS, FsmType::Move)));
static DIRECT_MOVE_FSM: LazyLock<Arc<Fsm>> =
    LazyLock::new(|| Arc::new(Fsm::new(&TRANSITIONS, FsmType::DirectMove)));

fn fsm_lookup(move_type: MoveType) -> Arc<Fsm> {
    match move_type {
        MoveType::Default => Arc::clone(&MOVE_FSM),
        MoveType::Direct => Arc::clone(&DIRECT_MOVE_FSM),
    }
}

/// A scheduled move command for a single entity.
///
/// The creation tick is immutable; the execution tick advances whenever the
/// planner splits the move and schedules the next segment. The observable
/// state is derived from the committed base state, the two ticks, and the
/// entity's position relative to the destination.
pub struct Action {
    base: Instance,
    // Tick at which the command was originally scheduled. Read-only.
    tick: Tick,
    // Construction sequence number; unique per action. Read-only.
    seq: u64,
    status: Arc<Status>,
    destination: Position,
    entity: Arc<dyn Moveable>,
    // Guards the derived-state read-modify cycle and the execution tick.
    execution_tick: Mutex<Tick>,
}

impl Action {
    pub fn new(
        entity: Arc<dyn Moveable>,
        status: Arc<Status>,
        destination: Position,
        move_type: MoveType,
    ) -> Action {
        let tick = status.tick();
        Action {
            base: Instance::new(fsm_lookup(move_type), commonstate::PENDING),
            tick,
            seq: ACTION_SEQ.fetch_add(1, Ordering::Relaxed),
            status,
            destination,
            entity,
            execution_tick: Mutex::new(tick),
        }
    }

    pub fn id(&self) -> ActionId {
        self.entity.id()
    }

    /// Stable per-action identifier ordered by construction. Unlike
    /// [`Action::id`], which two concurrent commands for one entity share,
    /// sequence numbers never collide; precedence ties are broken on them.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn fsm_type(&self) -> FsmType {
        self.base.fsm_type()
    }

    pub fn creation_tick(&self) -> Tick {
        self.tick
    }

    pub fn execution_tick(&self) -> Tick {
        *self.lock()
    }

    /// Destinations are immutable after construction.
    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn entity(&self) -> &Arc<dyn Moveable> {
        &self.entity
    }

    /// Re-arms the action for a later planning pass after a partial move.
    /// Until `tick` arrives the action observes as Pending again.
    pub fn schedule_partial_move(&self, tick: Tick) {
        *self.lock() = tick;
    }

    /// Whether this action supersedes `other`: same FSM flavor, scheduled no
    /// earlier, and targeting a different destination.
    pub fn precedence(&self, other: &Action) -> bool {
        self.fsm_type() == other.fsm_type()
            && self.tick >= other.tick
            && self.destination != other.destination
    }

    /// The observable state at the current tick.
    ///
    /// A Pending action whose execution tick has arrived projects forward:
    /// Finished when the entity already stands on the destination, Executing
    /// otherwise. Projections are validated as virtual transitions and leave
    /// the committed state untouched.
    pub fn state(&self) -> Result<State> {
        let execution_tick = self.lock();
        self.derived_state(*execution_tick)
    }

    /// Real transition to Canceled from the current observable state.
    pub fn cancel(&self) -> Result<()> {
        let execution_tick = self.lock();
        let s = self.derived_state(*execution_tick)?;
        self.base.to(s, commonstate::CANCELED, false)
    }

    fn derived_state(&self, execution_tick: Tick) -> Result<State> {
        let tick = self.status.tick();
        let s = self.base.state();
        if s != commonstate::PENDING {
            return Ok(s);
        }

        if execution_tick > tick {
            return Ok(commonstate::PENDING);
        }

        let projected = if self.destination == self.entity.position(tick) {
            commonstate::FINISHED
        } else {
            commonstate::EXECUTING
        };
        self.base.to(s, projected, true)?;
        Ok(projected)
    }

    fn lock(&self) -> MutexGuard<'_, Tick> {
        self.execution_tick.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
