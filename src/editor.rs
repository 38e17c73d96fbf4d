//! Keystroke-driven editing of an automaton.
//!
//! The editor keeps a side-table of human-readable transition labels keyed by
//! `(source, destination)` state ids, and turns key presses into transition-table edits:
//!
//! * With only a source selected, keys edit the selected state's name.
//! * Pushdown automata: each printable key adds a transition on that symbol from the source
//!   to the destination. Space stands for epsilon. Backspace removes the latest one.
//! * Turing machines: three keys (read symbol, write symbol, `L`/`R`) make one transition.
//!   Space stands for the blank symbol. Backspace cancels a partial sequence, or removes
//!   the latest transition when nothing is buffered.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::automaton::{Automaton, Kind};
use crate::state::{State, StateId};
use crate::tuple::TransitionTuple;
use crate::types::{char_symbol, symbol_label, AutomatonError, Direction, Symbol, BLANK, EPSILON};

/// A key press delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
}

/// One Turing machine transition as shown on a diagram edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuringLabel {
    pub read: Symbol,
    pub write: Symbol,
    pub direction: Direction,
}

impl fmt::Display for TuringLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{},{}",
            symbol_label(self.read),
            symbol_label(self.write),
            self.direction.label()
        )
    }
}

type Pair = (StateId, StateId);

#[derive(Debug, Default)]
pub struct TransitionEditor {
    selected: Option<StateId>,
    destination: Option<StateId>,
    symbols: HashMap<Pair, Vec<Symbol>>,
    moves: HashMap<Pair, Vec<TuringLabel>>,
    buffer: Vec<Symbol>,
}

impl TransitionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<StateId> {
        self.selected
    }

    pub fn destination(&self) -> Option<StateId> {
        self.destination
    }

    /// Returns the keys typed so far towards a Turing machine transition.
    pub fn buffer(&self) -> String {
        self.buffer.iter().copied().map(symbol_label).collect()
    }

    /// Selects a state, or clears the selection with `None`. Any destination is forgotten.
    pub fn select(
        &mut self,
        automaton: &mut Automaton,
        state: Option<StateId>,
    ) -> Result<(), AutomatonError> {
        if let Some(id) = state {
            automaton.set_selected(id, true)?;
        }
        if let Some(previous) = self.selected.filter(|&p| Some(p) != state) {
            if automaton.state(previous).is_some() {
                automaton.set_selected(previous, false)?;
            }
        }
        self.selected = state;
        self.destination = None;
        self.buffer.clear();
        Ok(())
    }

    /// Chooses the destination of transitions typed from the selected state.
    pub fn set_destination(
        &mut self,
        automaton: &Automaton,
        state: Option<StateId>,
    ) -> Result<(), AutomatonError> {
        if let Some(id) = state {
            automaton.state(id).ok_or(AutomatonError::UnknownState(id))?;
        }
        self.destination = state.filter(|_| self.selected.is_some());
        self.buffer.clear();
        Ok(())
    }

    /// Handles a key press. Keys with no selected state are ignored.
    pub fn key_pressed(&mut self, automaton: &mut Automaton, key: Key) -> Result<(), AutomatonError> {
        let Some(source) = self.selected else {
            return Ok(());
        };
        let Some(dest) = self.destination else {
            return rename(automaton, source, key);
        };

        if matches!(automaton.kind(), Kind::Turing(_)) {
            self.turing_key(automaton, (source, dest), key)
        } else {
            self.pushdown_key(automaton, (source, dest), key)
        }
    }

    fn pushdown_key(
        &mut self,
        automaton: &mut Automaton,
        (source, dest): Pair,
        key: Key,
    ) -> Result<(), AutomatonError> {
        let list = self.symbols.entry((source, dest)).or_default();
        match key {
            Key::Backspace => {
                if let Some(letter) = list.pop() {
                    automaton.remove_transition(
                        &TransitionTuple::with_letter(source, letter),
                        &TransitionTuple::state(dest),
                    );
                    trace!(%source, %dest, letter, "transition removed");
                }
            }
            Key::Char(c) => {
                let letter = match c {
                    ' ' => EPSILON,
                    _ => pushdown_symbol(c)?,
                };
                if list.contains(&letter) {
                    return Err(AutomatonError::DuplicateTransition(symbol_label(letter)));
                }
                automaton.add_transition(
                    TransitionTuple::with_letter(source, letter),
                    TransitionTuple::state(dest),
                )?;
                list.push(letter);
                trace!(%source, %dest, letter, "transition added");
            }
        }
        Ok(())
    }

    fn turing_key(
        &mut self,
        automaton: &mut Automaton,
        (source, dest): Pair,
        key: Key,
    ) -> Result<(), AutomatonError> {
        let c = match key {
            Key::Backspace if !self.buffer.is_empty() => {
                self.buffer.clear();
                return Ok(());
            }
            Key::Backspace => {
                if let Some(label) = self.moves.get_mut(&(source, dest)).and_then(Vec::pop) {
                    automaton.remove_transition(
                        &TransitionTuple::with_letter(source, label.read),
                        &TransitionTuple::with_move(dest, label.write, label.direction),
                    );
                    trace!(%source, %dest, %label, "transition removed");
                }
                return Ok(());
            }
            Key::Char(c) => c,
        };

        if !(' '..='~').contains(&c) {
            return Err(AutomatonError::InvalidKey(c));
        }

        if self.buffer.len() < 2 {
            self.buffer.push(if c == ' ' { BLANK } else { c as Symbol });
            return Ok(());
        }
        let (read, write) = (self.buffer[0], self.buffer[1]);
        let direction = Direction::from_key(c).ok_or(AutomatonError::InvalidDirection(c))?;
        let label = TuringLabel {
            read,
            write,
            direction,
        };

        automaton.add_transition(
            TransitionTuple::with_letter(source, read),
            TransitionTuple::with_move(dest, write, direction),
        )?;
        self.buffer.clear();

        // The table is deterministic, so the new rule replaced any rule on the same read symbol.
        for ((from, _), labels) in self.moves.iter_mut() {
            if *from == source {
                labels.retain(|l| l.read != read);
            }
        }
        self.moves.entry((source, dest)).or_default().push(label);
        trace!(%source, %dest, %label, "transition added");
        Ok(())
    }

    /// Returns the labels to draw on the edge from `source` to `dest`.
    pub fn labels(&self, source: StateId, dest: StateId) -> Vec<String> {
        let pair = (source, dest);
        if let Some(labels) = self.moves.get(&pair).filter(|l| !l.is_empty()) {
            return labels.iter().map(TuringLabel::to_string).collect();
        }
        match self.symbols.get(&pair).filter(|l| !l.is_empty()) {
            Some(symbols) => vec![symbols.iter().copied().map(symbol_label).collect()],
            None => Vec::new(),
        }
    }

    /// Removes a state from the automaton and drops every label that mentions it.
    pub fn remove_state(
        &mut self,
        automaton: &mut Automaton,
        id: StateId,
    ) -> Result<State, AutomatonError> {
        let state = automaton.remove_state(id)?;

        self.symbols.retain(|&(from, to), _| from != id && to != id);
        self.moves.retain(|&(from, to), _| from != id && to != id);
        if self.selected == Some(id) {
            self.selected = None;
            self.destination = None;
        }
        if self.destination == Some(id) {
            self.destination = None;
        }
        self.buffer.clear();
        debug!(%id, "state removed by editor");
        Ok(state)
    }
}

fn pushdown_symbol(c: char) -> Result<Symbol, AutomatonError> {
    match char_symbol(c)? {
        b if b >= b' ' && b != 0x7f => Ok(b),
        _ => Err(AutomatonError::InvalidKey(c)),
    }
}

fn rename(automaton: &mut Automaton, id: StateId, key: Key) -> Result<(), AutomatonError> {
    let mut name = automaton
        .state(id)
        .ok_or(AutomatonError::UnknownState(id))?
        .name()
        .to_string();

    match key {
        Key::Backspace => {
            name.pop();
        }
        Key::Char(c) if c.is_control() => return Err(AutomatonError::InvalidKey(c)),
        Key::Char(c) => name.push(c),
    }

    automaton.set_name(id, name)
}
