use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gridpath_core::errors::{Error, Result};

use crate::fsm::{commonstate, Fsm, FsmType, State};

/// A single live FSM with its committed state. All state queries and
/// transitions on an instance are serialized by its internal lock.
#[derive(Debug)]
pub struct Instance {
    fsm: Arc<Fsm>,
    state: Mutex<State>,
}

impl Instance {
    pub fn new(fsm: Arc<Fsm>, state: State) -> Instance {
        Instance { fsm, state: Mutex::new(state) }
    }

    pub fn fsm_type(&self) -> FsmType {
        self.fsm.fsm_type()
    }

    /// The committed state.
    pub fn state(&self) -> State {
        *self.lock()
    }

    /// Applies the transition `(from, to)`.
    ///
    /// Fails when the edge does not exist, or when a real transition is
    /// requested on a virtual-only edge. Virtual transitions never mutate
    /// the committed state; they exist so callers can validate projections.
    pub fn to(&self, from: State, to: State, is_virtual: bool) -> Result<()> {
        let mut cur = self.lock();
        Self::transition(&self.fsm, &mut cur, from, to, is_virtual)
    }

    /// Real transition from the committed state to Canceled.
    pub fn cancel(&self) -> Result<()> {
        let mut cur = self.lock();
        let from = *cur;
        Self::transition(&self.fsm, &mut cur, from, commonstate::CANCELED, false)
    }

    fn transition(
        fsm: &Fsm,
        cur: &mut State,
        from: State,
        to: State,
        is_virtual: bool,
    ) -> Result<()> {
        let Some(virtual_only) = fsm.exists(from, to) else {
            return Err(Error::FailedPrecondition(format!(
                "no transition exists between the {from} and {to} states"
            )));
        };
        if virtual_only && !is_virtual {
            return Err(Error::FailedPrecondition(format!(
                "real transition {from} -> {to} cannot occur on a virtual-only edge"
            )));
        }
        if !is_virtual {
            *cur = to;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
