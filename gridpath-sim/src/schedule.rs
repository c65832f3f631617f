use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::fsm::commonstate;
use crate::move_action::{Action, ActionId};

/// The per-tick action registry.
///
/// Actions are keyed by their stable id in a BTreeMap so that visiting order
/// within a tick is deterministic and precedence merges pick a repeatable
/// winner.
#[derive(Default)]
pub struct Schedule {
    actions: BTreeMap<ActionId, Arc<Action>>,
}

impl Schedule {
    pub fn new() -> Schedule {
        Schedule::default()
    }

    /// Merges a new action into the schedule.
    ///
    /// When an action for the same entity is already registered, the incoming
    /// one wins only if it takes precedence over the incumbent. Precedence is
    /// not antisymmetric: equal creation ticks with differing targets claim
    /// it both ways, so that tie is broken on the stable per-action sequence
    /// number — the earlier-constructed action wins — keeping winner
    /// selection acyclic. The loser is canceled.
    pub fn add(&mut self, action: Arc<Action>) {
        let id = action.id();
        let Some(existing) = self.actions.get(&id) else {
            self.actions.insert(id, action);
            return;
        };

        let incoming_wins = match (action.precedence(existing), existing.precedence(&action)) {
            (true, false) => true,
            (true, true) => action.seq() < existing.seq(),
            (false, _) => false,
        };

        if incoming_wins {
            if let Err(e) = existing.cancel() {
                // Already terminal; the replacement below is still correct.
                debug!(id, error = %e, "superseded action was not cancelable");
            }
            self.actions.insert(id, action);
        } else if let Err(e) = action.cancel() {
            debug!(id, error = %e, "rejected action was not cancelable");
        }
    }

    pub fn get(&self, id: ActionId) -> Option<&Arc<Action>> {
        self.actions.get(&id)
    }

    /// Actions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Action>> {
        self.actions.values()
    }

    /// Drops actions that reached a terminal state; returns how many remain.
    pub fn prune(&mut self) -> usize {
        self.actions.retain(|_, a| {
            !matches!(a.state(), Ok(s) if s == commonstate::CANCELED || s == commonstate::FINISHED)
        });
        self.actions.len()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
