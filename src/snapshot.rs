//! A read-only view of an automaton for renderers: states with their flags, the word being
//! processed, the step counter and verdict, and the tape of a Turing machine.

use serde::Serialize;

use crate::automaton::Automaton;
use crate::state::{State, StateId};
use crate::types::{symbol_label, AutomatonError, Phase, Verdict};

/// The tape portion of a Turing machine snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapeView {
    pub cells: String,
    pub head: usize,
    pub current: StateId,
    pub accept: StateId,
    pub reject: StateId,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub kind: &'static str,
    pub states: Vec<State>,
    pub start: StateId,
    pub word: Option<String>,
    pub steps: usize,
    pub verdict: Verdict,
    pub phase: Phase,
    pub tape: Option<TapeView>,
}

impl Snapshot {
    /// Renders the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, AutomatonError> {
        serde_json::to_string(self).map_err(|e| AutomatonError::SerializationError(e.to_string()))
    }
}

impl Automaton {
    /// Captures the state of the automaton for display.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            kind: self.kind().name(),
            states: self.states().to_vec(),
            start: self.start_state(),
            word: self
                .word()
                .map(|word| word.iter().copied().map(symbol_label).collect()),
            steps: self.steps_taken(),
            verdict: self.verdict(),
            phase: self.phase(),
            tape: self.as_turing().map(|config| TapeView {
                cells: config.tape_string(),
                head: config.head(),
                current: config.current(),
                accept: config.accept_state(),
                reject: config.reject_state(),
            }),
        }
    }
}
