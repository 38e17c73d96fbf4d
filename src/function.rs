//! This module defines the `TransitionFunction`, a mapping from domain tuples to an ordered
//! list of range tuples.
//!
//! NFAs and PDAs are non-deterministic: a single (state, letter) tuple may map to several
//! destination tuples. Turing machines are deterministic: every domain tuple maps to at most
//! one destination tuple, and adding a transition replaces the previous one.

use std::collections::HashMap;

use crate::state::StateId;
use crate::tuple::TransitionTuple;

/// Whether a `TransitionFunction` keeps one or many results per key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// At most one result per key; the most recent add wins.
    Deterministic,
    /// Results accumulate in insertion order.
    #[default]
    NonDeterministic,
}

/// A finite state machine transition function.
#[derive(Debug, Clone, Default)]
pub struct TransitionFunction {
    transitions: HashMap<TransitionTuple, Vec<TransitionTuple>>,
    mode: Mode,
}

impl TransitionFunction {
    pub fn new(mode: Mode) -> Self {
        Self {
            transitions: HashMap::new(),
            mode,
        }
    }

    pub fn deterministic() -> Self {
        Self::new(Mode::Deterministic)
    }

    pub fn non_deterministic() -> Self {
        Self::new(Mode::NonDeterministic)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_deterministic(&self) -> bool {
        self.mode == Mode::Deterministic
    }

    /// Adds a transition from one tuple to another.
    ///
    /// In deterministic mode any existing result for `from` is discarded first. In
    /// non-deterministic mode the result is appended without checking for duplicates.
    pub fn add_transition(&mut self, from: TransitionTuple, to: TransitionTuple) {
        let results = self.transitions.entry(from).or_default();
        if self.mode == Mode::Deterministic {
            results.clear();
        }
        results.push(to);
    }

    /// Removes the transition from one tuple to another. Absent transitions are ignored.
    pub fn remove_transition(&mut self, from: &TransitionTuple, to: &TransitionTuple) {
        if let Some(results) = self.transitions.get_mut(from) {
            if let Some(i) = results.iter().position(|t| t == to) {
                results.remove(i);
            }
            if results.is_empty() {
                self.transitions.remove(from);
            }
        }
    }

    /// Returns every result of the given domain tuple, in insertion order.
    pub fn transitions(&self, from: &TransitionTuple) -> &[TransitionTuple] {
        self.transitions
            .get(from)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first result of the given domain tuple, if any.
    pub fn transition(&self, from: &TransitionTuple) -> Option<&TransitionTuple> {
        self.transitions(from).first()
    }

    pub fn has_transition(&self, from: &TransitionTuple, to: &TransitionTuple) -> bool {
        self.transitions(from).contains(to)
    }

    /// Severs every transition that mentions `state`, as source or as destination.
    ///
    /// Returns the number of (domain, range) pairs removed.
    pub fn remove_state(&mut self, state: StateId) -> usize {
        let mut removed = 0;
        self.transitions.retain(|from, results| {
            if from.state_id() == state {
                removed += results.len();
                return false;
            }
            let before = results.len();
            results.retain(|to| to.state_id() != state);
            removed += before - results.len();
            !results.is_empty()
        });
        removed
    }

    /// Iterates over every (domain, range) pair in the function.
    pub fn iter(&self) -> impl Iterator<Item = (&TransitionTuple, &TransitionTuple)> {
        self.transitions
            .iter()
            .flat_map(|(from, results)| results.iter().map(move |to| (from, to)))
    }

    /// Returns the total number of (domain, range) pairs.
    pub fn len(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
