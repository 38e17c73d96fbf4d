//! Transition tuples serve both as transition-table keys (domain tuples) and as
//! transition-table results (range tuples).
//!
//! | kind | domain tuple          | range tuple                  |
//! |------|-----------------------|------------------------------|
//! | NFA  | (state, letter)       | (state)                      |
//! | PDA  | (state, letter)       | (state)                      |
//! | TM   | (state, symbol read)  | (state, symbol, direction)   |

use serde::Serialize;

use crate::state::StateId;
use crate::types::{Direction, Symbol};

/// An immutable tuple over (state, letter, symbol, direction).
///
/// Unused symbol fields hold `0` and an unused direction is `None`, which is distinct from
/// both directions. Equality and hashing are structural over all four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitionTuple {
    state: StateId,
    letter: Symbol,
    symbol: Symbol,
    direction: Option<Direction>,
}

impl TransitionTuple {
    /// Constructs a (state) tuple.
    pub fn state(state: StateId) -> Self {
        Self::new(state, 0, 0, None)
    }

    /// Constructs a (state, letter) tuple.
    pub fn with_letter(state: StateId, letter: Symbol) -> Self {
        Self::new(state, letter, 0, None)
    }

    /// Constructs a (state, symbol, direction) tuple.
    pub fn with_move(state: StateId, symbol: Symbol, direction: Direction) -> Self {
        Self::new(state, 0, symbol, Some(direction))
    }

    fn new(state: StateId, letter: Symbol, symbol: Symbol, direction: Option<Direction>) -> Self {
        Self {
            state,
            letter,
            symbol,
            direction,
        }
    }

    pub fn state_id(&self) -> StateId {
        self.state
    }

    pub fn letter(&self) -> Symbol {
        self.letter
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}
