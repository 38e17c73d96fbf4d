//! States of an automaton. A state's identity is a process-wide id assigned at creation;
//! names and positions are labels only and never take part in equality or hashing.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_STATE_ID: AtomicUsize = AtomicUsize::new(0);

/// The stable identity of a `State`. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(usize);

impl StateId {
    fn next() -> Self {
        StateId(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The (x, y) location of a state in the diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An automaton or Turing machine state.
///
/// The `current` flag is owned by the engine and reflects whether the state takes part in
/// the live configuration. `selected` and `position` belong to the editor.
#[derive(Debug, Clone, Serialize)]
pub struct State {
    id: StateId,
    name: String,
    accept: bool,
    current: bool,
    selected: bool,
    position: Position,
}

impl State {
    /// Creates a new state with a fresh id.
    pub fn new(name: impl Into<String>, accept: bool) -> Self {
        Self::at(name, accept, Position::default())
    }

    /// Creates a new state with a fresh id at the given diagram position.
    pub fn at(name: impl Into<String>, accept: bool, position: Position) -> Self {
        Self {
            id: StateId::next(),
            name: name.into(),
            accept,
            current: false,
            selected: false,
            position,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_accept(&self) -> bool {
        self.accept
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_accept(&mut self, accept: bool) {
        self.accept = accept;
    }

    pub(crate) fn set_current(&mut self, current: bool) {
        self.current = current;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl std::hash::Hash for State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
