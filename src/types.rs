//! This module defines the core data structures and types shared by every automaton kind,
//! including the symbol alphabet, head directions, computation verdicts and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::StateId;

/// A symbol of the input alphabet or tape alphabet. Symbols are narrow, byte-sized values.
pub type Symbol = u8;

/// The reserved symbol marking an epsilon transition.
pub const EPSILON: Symbol = 1;
/// The blank tape symbol of a Turing machine. It shares its value with `EPSILON`.
pub const BLANK: Symbol = EPSILON;
/// The character used to display `EPSILON` (and `BLANK`) in transition labels.
pub const EPSILON_LABEL: char = 'ε';
/// The default number of steps performed by a single step request from the host.
pub const DEFAULT_STEP_SIZE: usize = 1;
/// The maximum number of steps to execute before giving up on a run.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Returns the display character for a symbol, using `EPSILON_LABEL` for the reserved value.
pub fn symbol_label(symbol: Symbol) -> char {
    if symbol == EPSILON {
        EPSILON_LABEL
    } else {
        symbol as char
    }
}

/// Returns the symbol for a typed character. Only characters up to U+00FF have one.
pub fn char_symbol(c: char) -> Result<Symbol, AutomatonError> {
    u8::try_from(c).map_err(|_| AutomatonError::InvalidKey(c))
}

/// Converts text to a word, one symbol per character.
pub fn word_from_str(text: &str) -> Result<Vec<Symbol>, AutomatonError> {
    text.chars().map(char_symbol).collect()
}

/// Represents the possible directions a Turing machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Parses a direction key, accepting `L`/`R` in either case.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'L' | 'l' => Some(Direction::Left),
            'R' | 'r' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Returns the single-letter label used in transition lists.
    pub fn label(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// The outcome of a computation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The computation has not decided yet.
    #[default]
    Unknown,
    /// The word was accepted.
    Accept,
    /// The word was rejected, or the configuration died.
    Reject,
}

impl Verdict {
    pub fn is_decided(self) -> bool {
        self != Verdict::Unknown
    }

    /// Converts the verdict into the tri-state `Option<bool>` form.
    pub fn accepts(self) -> Option<bool> {
        match self {
            Verdict::Unknown => None,
            Verdict::Accept => Some(true),
            Verdict::Reject => Some(false),
        }
    }
}

impl From<bool> for Verdict {
    fn from(accept: bool) -> Self {
        if accept {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

/// The lifecycle phase of an automaton's computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No computation has been started.
    Idle,
    /// A computation is in progress and has not decided.
    Running,
    /// The computation reached a verdict.
    Finished,
}

/// Represents various errors that can occur while building, editing or driving an automaton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Indicates a state id that does not belong to the automaton.
    #[error("Unknown state: {0}")]
    UnknownState(StateId),
    /// Indicates an attempt to add a state that is already present.
    #[error("Duplicate state: {0}")]
    DuplicateState(StateId),
    /// Indicates an attempt to delete a state the machine cannot run without.
    #[error("State {id} is the {role} state and cannot be removed")]
    ProtectedState { id: StateId, role: &'static str },
    /// Indicates an inconsistent automaton definition.
    #[error("Automaton validation error: {0}")]
    ValidationError(String),
    /// Indicates a step size that is not a positive integer.
    #[error("Invalid step size: {0:?}")]
    InvalidStepSize(String),
    /// Indicates a keystroke outside the accepted range.
    #[error("Invalid key: {0:?}")]
    InvalidKey(char),
    /// Indicates a keystroke that would repeat a transition already on the list.
    #[error("Transition on {0:?} already present")]
    DuplicateTransition(char),
    /// Indicates a direction key other than `L` or `R`.
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(char),
    /// Indicates that the automaton lock was poisoned by a panicking holder.
    #[error("Failed to acquire automaton lock")]
    LockPoisoned,
    /// Indicates a failure to render a snapshot.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
