//! This module defines the `Automaton` struct, the shared record behind every machine kind.
//! It owns the states, the start state and the transition function, tracks the per-run
//! fields (word, step counter and verdict), and dispatches `start`/`step` to the
//! kind-specific engine held in `Kind`.

use tracing::{debug, warn};

use crate::function::TransitionFunction;
use crate::pushdown::PushdownConfig;
use crate::state::{Position, State, StateId};
use crate::tuple::TransitionTuple;
use crate::turing::TuringConfig;
use crate::types::{word_from_str, AutomatonError, Phase, Symbol, Verdict};

/// The per-run fields shared by every automaton kind.
#[derive(Debug, Clone, Default)]
pub struct Run {
    word: Option<Vec<Symbol>>,
    step: usize,
    verdict: Verdict,
}

impl Run {
    fn start(word: Vec<Symbol>) -> Self {
        Self {
            word: Some(word),
            step: 0,
            verdict: Verdict::Unknown,
        }
    }

    pub fn word(&self) -> Option<&[Symbol]> {
        self.word.as_deref()
    }

    pub fn steps(&self) -> usize {
        self.step
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn phase(&self) -> Phase {
        match (&self.word, self.verdict) {
            (None, _) => Phase::Idle,
            (Some(_), Verdict::Unknown) => Phase::Running,
            (Some(_), _) => Phase::Finished,
        }
    }

    /// Returns the word of a computation that may still step. Logs and returns `None`
    /// for spurious step requests.
    pub(crate) fn steppable(&self, kind: &'static str) -> Option<&[Symbol]> {
        if self.verdict.is_decided() {
            warn!(kind, "step requested when computation is already done");
            return None;
        }
        if self.word.is_none() {
            warn!(kind, "step requested with no computation specified");
        }
        self.word.as_deref()
    }

    pub(crate) fn advance(&mut self) {
        self.step += 1;
    }

    pub(crate) fn decide(&mut self, verdict: Verdict) {
        if !self.verdict.is_decided() {
            debug!(?verdict, steps = self.step, "computation decided");
            self.verdict = verdict;
        }
    }
}

/// The borrowed parts of an automaton a stepping engine reads and writes.
pub(crate) struct Tables<'a> {
    pub states: &'a mut [State],
    pub function: &'a TransitionFunction,
    pub start: StateId,
}

/// The kind-specific configuration of an automaton.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Non-deterministic multi-state tracking with epsilon closure. Also runs NFAs.
    Pushdown(PushdownConfig),
    /// Deterministic single-state tape rewriting.
    Turing(TuringConfig),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Pushdown(_) => "pushdown",
            Kind::Turing(_) => "turing",
        }
    }
}

/// An NFA, pushdown automaton or Turing machine together with its current computation.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
    function: TransitionFunction,
    run: Run,
    kind: Kind,
}

impl Automaton {
    /// Creates a pushdown automaton with an empty non-deterministic transition function.
    pub fn pushdown(states: Vec<State>, start: StateId) -> Result<Self, AutomatonError> {
        Self::pushdown_with(states, start, TransitionFunction::non_deterministic())
    }

    /// Creates a pushdown automaton with the given transition function.
    pub fn pushdown_with(
        states: Vec<State>,
        start: StateId,
        function: TransitionFunction,
    ) -> Result<Self, AutomatonError> {
        let config = PushdownConfig::new(states.len());
        Self::build(states, start, function, Kind::Pushdown(config))
    }

    /// Creates a Turing machine with an empty deterministic transition function.
    pub fn turing(
        states: Vec<State>,
        start: StateId,
        accept: StateId,
        reject: StateId,
    ) -> Result<Self, AutomatonError> {
        Self::turing_with(
            states,
            start,
            accept,
            reject,
            TransitionFunction::deterministic(),
        )
    }

    /// Creates a Turing machine with the given transition function, which must be deterministic.
    pub fn turing_with(
        states: Vec<State>,
        start: StateId,
        accept: StateId,
        reject: StateId,
        function: TransitionFunction,
    ) -> Result<Self, AutomatonError> {
        if !function.is_deterministic() {
            return Err(AutomatonError::ValidationError(
                "A Turing machine requires a deterministic transition function".to_string(),
            ));
        }
        if accept == reject {
            return Err(AutomatonError::ValidationError(
                "Accept and reject states must differ".to_string(),
            ));
        }
        for id in [accept, reject] {
            if !states.iter().any(|s| s.id() == id) {
                return Err(AutomatonError::UnknownState(id));
            }
        }
        let config = TuringConfig::new(start, accept, reject);
        Self::build(states, start, function, Kind::Turing(config))
    }

    fn build(
        states: Vec<State>,
        start: StateId,
        function: TransitionFunction,
        kind: Kind,
    ) -> Result<Self, AutomatonError> {
        for (i, state) in states.iter().enumerate() {
            if states[..i].iter().any(|s| s.id() == state.id()) {
                return Err(AutomatonError::DuplicateState(state.id()));
            }
        }

        let automaton = Self {
            states,
            start,
            function,
            run: Run::default(),
            kind,
        };

        if automaton.index_of(start).is_none() {
            return Err(AutomatonError::UnknownState(start));
        }
        for (from, to) in automaton.function.iter() {
            automaton.check_transition(from, to)?;
        }

        debug!(
            kind = automaton.kind.name(),
            states = automaton.states.len(),
            transitions = automaton.function.len(),
            "automaton created"
        );
        Ok(automaton)
    }

    // Lifecycle

    /// Starts a new computation on `word`, given as raw symbols, discarding any computation
    /// in progress.
    pub fn start_computation(&mut self, word: impl AsRef<[u8]>) {
        self.run = Run::start(word.as_ref().to_vec());
        debug!(
            kind = self.kind.name(),
            len = word.as_ref().len(),
            "computation started"
        );

        let (tables, run, kind) = self.split();
        match kind {
            Kind::Pushdown(config) => config.start(tables, run),
            Kind::Turing(config) => config.start(tables, run),
        }
    }

    /// Starts a new computation on typed text, one symbol per character.
    ///
    /// Text holding a character above U+00FF is refused and the current computation is kept.
    pub fn start_computation_text(&mut self, text: &str) -> Result<(), AutomatonError> {
        let word = word_from_str(text)?;
        self.start_computation(word);
        Ok(())
    }

    /// Advances the current computation by one step. A no-op once finished or before any
    /// computation was started.
    pub fn step(&mut self) {
        let (tables, run, kind) = self.split();
        match kind {
            Kind::Pushdown(config) => config.step(tables, run),
            Kind::Turing(config) => config.step(tables, run),
        }
    }

    /// Restarts the current computation with the previously given word.
    pub fn restart_computation(&mut self) {
        match self.run.word.take() {
            Some(word) => self.start_computation(word),
            None => warn!(kind = self.kind.name(), "restart requested with no word"),
        }
    }

    fn split(&mut self) -> (Tables<'_>, &mut Run, &mut Kind) {
        let tables = Tables {
            states: &mut self.states,
            function: &self.function,
            start: self.start,
        };
        (tables, &mut self.run, &mut self.kind)
    }

    pub fn is_finished(&self) -> bool {
        self.run.verdict.is_decided()
    }

    /// Returns whether the word is accepted, or `None` if the computation has not decided.
    pub fn accepts(&self) -> Option<bool> {
        self.run.verdict.accepts()
    }

    pub fn verdict(&self) -> Verdict {
        self.run.verdict
    }

    pub fn phase(&self) -> Phase {
        self.run.phase()
    }

    pub fn steps_taken(&self) -> usize {
        self.run.step
    }

    pub fn word(&self) -> Option<&[Symbol]> {
        self.run.word()
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    // Structure

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id() == id)
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn function(&self) -> &TransitionFunction {
        &self.function
    }

    /// Returns the ids of the states taking part in the live configuration.
    pub fn current_states(&self) -> Vec<StateId> {
        self.states
            .iter()
            .filter(|s| s.is_current())
            .map(State::id)
            .collect()
    }

    /// Returns the Turing machine configuration, if this is a Turing machine.
    pub fn as_turing(&self) -> Option<&TuringConfig> {
        match &self.kind {
            Kind::Turing(config) => Some(config),
            Kind::Pushdown(_) => None,
        }
    }

    /// Returns the pushdown configuration, if this is a pushdown automaton.
    pub fn as_pushdown(&self) -> Option<&PushdownConfig> {
        match &self.kind {
            Kind::Pushdown(config) => Some(config),
            Kind::Turing(_) => None,
        }
    }

    pub(crate) fn index_of(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|s| s.id() == id)
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State, AutomatonError> {
        self.states
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(AutomatonError::UnknownState(id))
    }

    /// Adds a state to the automaton.
    pub fn add_state(&mut self, state: State) -> Result<StateId, AutomatonError> {
        let id = state.id();
        if self.index_of(id).is_some() {
            return Err(AutomatonError::DuplicateState(id));
        }
        self.states.push(state);
        if let Kind::Pushdown(config) = &mut self.kind {
            config.push_slot();
        }
        debug!(%id, "state added");
        Ok(id)
    }

    /// Creates a new state and adds it to the automaton.
    pub fn create_state(&mut self, name: impl Into<String>, accept: bool) -> StateId {
        let state = State::new(name, accept);
        let id = state.id();
        self.states.push(state);
        if let Kind::Pushdown(config) = &mut self.kind {
            config.push_slot();
        }
        debug!(%id, "state added");
        id
    }

    /// Removes a state, first severing every transition that references it.
    ///
    /// The start state can never be removed; nor can a Turing machine's accept or reject
    /// state, or its current state while a computation is running.
    pub fn remove_state(&mut self, id: StateId) -> Result<State, AutomatonError> {
        let index = self.index_of(id).ok_or(AutomatonError::UnknownState(id))?;
        if id == self.start {
            return Err(AutomatonError::ProtectedState { id, role: "start" });
        }
        if let Kind::Turing(config) = &self.kind {
            if let Some(role) = config.role_of(id) {
                return Err(AutomatonError::ProtectedState { id, role });
            }
            if config.current() == id && self.run.phase() == Phase::Running {
                return Err(AutomatonError::ProtectedState {
                    id,
                    role: "current",
                });
            }
        }

        let severed = self.function.remove_state(id);
        if let Kind::Pushdown(config) = &mut self.kind {
            config.remove_slot(index);
        }
        debug!(%id, severed, "state removed");
        Ok(self.states.remove(index))
    }

    pub fn set_name(&mut self, id: StateId, name: impl Into<String>) -> Result<(), AutomatonError> {
        self.state_mut(id)?.set_name(name.into());
        Ok(())
    }

    pub fn set_accept(&mut self, id: StateId, accept: bool) -> Result<(), AutomatonError> {
        self.state_mut(id)?.set_accept(accept);
        Ok(())
    }

    pub fn set_position(&mut self, id: StateId, position: Position) -> Result<(), AutomatonError> {
        self.state_mut(id)?.set_position(position);
        Ok(())
    }

    pub fn set_selected(&mut self, id: StateId, selected: bool) -> Result<(), AutomatonError> {
        self.state_mut(id)?.set_selected(selected);
        Ok(())
    }

    // Transitions

    fn check_transition(
        &self,
        from: &TransitionTuple,
        to: &TransitionTuple,
    ) -> Result<(), AutomatonError> {
        for id in [from.state_id(), to.state_id()] {
            if self.index_of(id).is_none() {
                return Err(AutomatonError::UnknownState(id));
            }
        }
        if matches!(self.kind, Kind::Turing(_)) && to.direction().is_none() {
            return Err(AutomatonError::ValidationError(format!(
                "Turing transition from {} has no head direction",
                from.state_id()
            )));
        }
        Ok(())
    }

    /// Adds a transition after checking that both tuples name states of this automaton.
    pub fn add_transition(
        &mut self,
        from: TransitionTuple,
        to: TransitionTuple,
    ) -> Result<(), AutomatonError> {
        self.check_transition(&from, &to)?;
        self.function.add_transition(from, to);
        Ok(())
    }

    pub fn remove_transition(&mut self, from: &TransitionTuple, to: &TransitionTuple) {
        self.function.remove_transition(from, to);
    }
}
