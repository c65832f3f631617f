use std::fmt;

use rustc_hash::FxHashMap;

/// Opaque FSM state identifier. States compare by name equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(&'static str);

impl State {
    pub const fn new(name: &'static str) -> State {
        State(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// States shared by the action FSMs.
pub mod commonstate {
    use super::State;

    pub const UNKNOWN: State = State::new("unknown");
    pub const PENDING: State = State::new("pending");
    pub const EXECUTING: State = State::new("executing");
    pub const CANCELED: State = State::new("canceled");
    pub const FINISHED: State = State::new("finished");
}

/// Registered FSM flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmType {
    Move,
    DirectMove,
}

/// A directed FSM edge. Virtual-only edges validate a state projection but
/// may never be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: State,
    pub to: State,
    pub virtual_only: bool,
}

/// A labeled directed graph of states, indexed for O(1) membership checks.
#[derive(Debug)]
pub struct Fsm {
    fsm_type: FsmType,
    // (from, to) -> virtual_only
    transitions: FxHashMap<(State, State), bool>,
}

impl Fsm {
    pub fn new(transitions: &[Transition], fsm_type: FsmType) -> Fsm {
        Fsm {
            fsm_type,
            transitions: transitions
                .iter()
                .map(|t| ((t.from, t.to), t.virtual_only))
                .collect(),
        }
    }

    pub fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    /// Whether the edge `(from, to)` exists; `Some(virtual_only)` when it
    /// does.
    pub fn exists(&self, from: State, to: State) -> Option<bool> {
        self.transitions.get(&(from, to)).copied()
    }
}
