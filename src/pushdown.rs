//! Non-deterministic stepping with epsilon closure.
//!
//! The live configuration is a membership vector over the automaton's states, aligned with
//! the order of `Automaton::states`. Each step replaces the vector with the union of the
//! marked states' transitions on the next input symbol, closed under epsilon transitions.
//! No stack is modelled, so the same engine runs NFAs.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::automaton::{Run, Tables};
use crate::function::TransitionFunction;
use crate::state::{State, StateId};
use crate::tuple::TransitionTuple;
use crate::types::{Symbol, Verdict, EPSILON};

const KIND: &str = "pushdown";

/// The membership vector of a pushdown automaton's computation.
#[derive(Debug, Clone, Default)]
pub struct PushdownConfig {
    current: Vec<bool>,
}

impl PushdownConfig {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            current: vec![false; len],
        }
    }

    /// Returns the membership vector, one flag per state in `Automaton::states` order.
    pub fn membership(&self) -> &[bool] {
        &self.current
    }

    /// Returns true if no state is marked.
    pub fn is_dead(&self) -> bool {
        !self.current.iter().any(|&b| b)
    }

    pub(crate) fn push_slot(&mut self) {
        self.current.push(false);
    }

    pub(crate) fn remove_slot(&mut self, index: usize) {
        if index < self.current.len() {
            self.current.remove(index);
        }
    }

    pub(crate) fn start(&mut self, tables: Tables<'_>, run: &mut Run) {
        self.current = tables
            .states
            .iter()
            .map(|s| s.id() == tables.start)
            .collect();
        epsilon_closure(tables.states, tables.function, &mut self.current);
        self.sync_and_check(tables.states, run);
    }

    pub(crate) fn step(&mut self, tables: Tables<'_>, run: &mut Run) {
        let Some(word) = run.steppable(KIND) else {
            return;
        };
        let Some(&letter) = word.get(run.steps()) else {
            return;
        };

        let states = &*tables.states;
        let mut next = successors(states, tables.function, &self.current, letter);
        epsilon_closure(states, tables.function, &mut next);
        self.current = next;

        trace!(
            step = run.steps(),
            letter,
            marked = self.current.iter().filter(|&&b| b).count(),
            "consumed symbol"
        );

        if self.is_dead() {
            debug!(step = run.steps(), "configuration died");
            run.decide(Verdict::Reject);
            self.sync_and_check(tables.states, run);
            return;
        }

        run.advance();
        self.sync_and_check(tables.states, run);
    }

    /// Copies the membership vector onto the states' `current` flags, then decides the
    /// computation if the whole word has been consumed.
    fn sync_and_check(&self, states: &mut [State], run: &mut Run) {
        for (state, &marked) in states.iter_mut().zip(&self.current) {
            state.set_current(marked);
        }

        let Some(word) = run.word() else {
            return;
        };
        if run.steps() == word.len() {
            let accept = states
                .iter()
                .zip(&self.current)
                .any(|(s, &marked)| marked && s.is_accept());
            run.decide(Verdict::from(accept));
        }
    }
}

fn index_map(states: &[State]) -> HashMap<StateId, usize> {
    states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id(), i))
        .collect()
}

/// Returns the membership vector reached from `current` by consuming `letter`.
fn successors(
    states: &[State],
    function: &TransitionFunction,
    current: &[bool],
    letter: Symbol,
) -> Vec<bool> {
    let index = index_map(states);
    let mut next = vec![false; states.len()];

    for (state, _) in states.iter().zip(current).filter(|(_, &marked)| marked) {
        for to in function.transitions(&TransitionTuple::with_letter(state.id(), letter)) {
            if let Some(&i) = index.get(&to.state_id()) {
                next[i] = true;
            }
        }
    }

    next
}

/// Extends `current` with every state reachable through epsilon transitions.
///
/// `current` is indexed in `states` order. Each newly marked state is expanded exactly
/// once, so the closure terminates after at most `states.len()` expansions. A vector whose
/// length differs from `states` is left unchanged.
pub fn epsilon_closure(states: &[State], function: &TransitionFunction, current: &mut [bool]) {
    if current.len() != states.len() {
        warn!(
            states = states.len(),
            membership = current.len(),
            "membership vector does not match the states"
        );
        return;
    }

    let index = index_map(states);
    let mut stack: Vec<usize> = current
        .iter()
        .enumerate()
        .filter(|(_, &marked)| marked)
        .map(|(i, _)| i)
        .collect();

    while let Some(i) = stack.pop() {
        let from = TransitionTuple::with_letter(states[i].id(), EPSILON);
        for to in function.transitions(&from) {
            if let Some(&j) = index.get(&to.state_id()) {
                if !current[j] {
                    current[j] = true;
                    stack.push(j);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::types::Phase;
    use proptest::prelude::*;

    /// `start` (accept) loops on `a` and has an epsilon edge to `q1` (accept), which loops on `b`.
    fn a_star_b_star() -> Automaton {
        let start = State::new("start", true);
        let q1 = State::new("q1", true);
        let (s, q) = (start.id(), q1.id());
        let mut pda = Automaton::pushdown(vec![start, q1], s).unwrap();
        pda.add_transition(TransitionTuple::with_letter(s, b'a'), TransitionTuple::state(s))
            .unwrap();
        pda.add_transition(TransitionTuple::with_letter(s, EPSILON), TransitionTuple::state(q))
            .unwrap();
        pda.add_transition(TransitionTuple::with_letter(q, b'b'), TransitionTuple::state(q))
            .unwrap();
        pda
    }

    fn run_to_end(pda: &mut Automaton, word: &str) {
        pda.start_computation(word);
        while !pda.is_finished() {
            pda.step();
        }
    }

    #[test]
    fn test_start_applies_epsilon_closure() {
        let mut pda = a_star_b_star();
        pda.start_computation("ab");

        assert_eq!(pda.as_pushdown().unwrap().membership(), &[true, true]);
        assert!(pda.states().iter().all(State::is_current));
        assert_eq!(pda.phase(), Phase::Running);
    }

    #[test]
    fn test_accepts_aab() {
        let mut pda = a_star_b_star();
        run_to_end(&mut pda, "aab");

        assert_eq!(pda.accepts(), Some(true));
        assert_eq!(pda.steps_taken(), 3);
    }

    #[test]
    fn test_rejects_aba_when_configuration_dies() {
        let mut pda = a_star_b_star();
        pda.start_computation("aba");
        pda.step();
        pda.step();
        assert_eq!(pda.verdict(), Verdict::Unknown);

        pda.step();

        assert_eq!(pda.verdict(), Verdict::Reject);
        assert_eq!(pda.steps_taken(), 2);
        assert!(pda.as_pushdown().unwrap().is_dead());
        assert!(pda.current_states().is_empty());
    }

    #[test]
    fn test_dies_mid_word() {
        let mut pda = a_star_b_star();
        pda.start_computation("ca");
        pda.step();

        assert_eq!(pda.verdict(), Verdict::Reject);
        assert_eq!(pda.steps_taken(), 0);
    }

    #[test]
    fn test_empty_word_without_transitions() {
        for accept in [true, false] {
            let start = State::new("start", accept);
            let s = start.id();
            let mut pda = Automaton::pushdown(vec![start], s).unwrap();

            pda.start_computation("");

            assert_eq!(pda.accepts(), Some(accept));
            assert_eq!(pda.phase(), Phase::Finished);
        }
    }

    #[test]
    fn test_accept_reached_through_epsilon_only() {
        let start = State::new("start", false);
        let q1 = State::new("q1", false);
        let q2 = State::new("q2", true);
        let ids = [start.id(), q1.id(), q2.id()];
        let mut pda = Automaton::pushdown(vec![start, q1, q2], ids[0]).unwrap();
        pda.add_transition(
            TransitionTuple::with_letter(ids[0], EPSILON),
            TransitionTuple::state(ids[1]),
        )
        .unwrap();
        pda.add_transition(
            TransitionTuple::with_letter(ids[1], EPSILON),
            TransitionTuple::state(ids[2]),
        )
        .unwrap();

        pda.start_computation("");

        assert_eq!(pda.accepts(), Some(true));
        assert_eq!(pda.current_states(), ids.to_vec());
    }

    #[test]
    fn test_epsilon_cycle_terminates() {
        let a = State::new("a", false);
        let b = State::new("b", false);
        let (ia, ib) = (a.id(), b.id());
        let mut function = TransitionFunction::non_deterministic();
        function.add_transition(TransitionTuple::with_letter(ia, EPSILON), TransitionTuple::state(ib));
        function.add_transition(TransitionTuple::with_letter(ib, EPSILON), TransitionTuple::state(ia));
        let states = vec![a, b];

        let mut current = vec![true, false];
        epsilon_closure(&states, &function, &mut current);

        assert_eq!(current, vec![true, true]);
    }

    #[test_log::test]
    fn test_epsilon_closure_ignores_mismatched_vector() {
        let a = State::new("a", false);
        let b = State::new("b", false);
        let (ia, ib) = (a.id(), b.id());
        let mut function = TransitionFunction::non_deterministic();
        function.add_transition(TransitionTuple::with_letter(ia, EPSILON), TransitionTuple::state(ib));
        let states = vec![a, b];

        let mut longer = vec![true, false, true];
        epsilon_closure(&states, &function, &mut longer);
        assert_eq!(longer, vec![true, false, true]);

        let mut shorter = vec![true];
        epsilon_closure(&states, &function, &mut shorter);
        assert_eq!(shorter, vec![true]);
    }

    #[test_log::test]
    fn test_step_after_verdict_is_noop() {
        let mut pda = a_star_b_star();
        run_to_end(&mut pda, "aba");
        let membership = pda.as_pushdown().unwrap().membership().to_vec();

        pda.step();
        pda.step();

        assert_eq!(pda.verdict(), Verdict::Reject);
        assert_eq!(pda.as_pushdown().unwrap().membership(), membership.as_slice());
    }

    #[test]
    fn test_restart_replays_word() {
        let mut pda = a_star_b_star();
        run_to_end(&mut pda, "aab");

        pda.restart_computation();

        assert_eq!(pda.phase(), Phase::Running);
        assert_eq!(pda.steps_taken(), 0);
        assert_eq!(pda.word(), Some(&b"aab"[..]));
    }

    #[test]
    fn test_added_state_joins_running_computation() {
        let mut pda = a_star_b_star();
        pda.start_computation("ab");
        let extra = pda.create_state("extra", true);
        let s = pda.start_state();
        pda.add_transition(TransitionTuple::with_letter(s, b'a'), TransitionTuple::state(extra))
            .unwrap();

        pda.step();

        assert!(pda.state(extra).unwrap().is_current());
        assert_eq!(pda.as_pushdown().unwrap().membership().len(), 3);
    }

    proptest! {
        #[test]
        fn prop_epsilon_closure_is_idempotent(
            edges in proptest::collection::vec((0usize..6, 0usize..6), 0..15),
            seed in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let states: Vec<State> = (0..6).map(|i| State::new(format!("q{i}"), false)).collect();
            let mut function = TransitionFunction::non_deterministic();
            for (from, to) in edges {
                function.add_transition(
                    TransitionTuple::with_letter(states[from].id(), EPSILON),
                    TransitionTuple::state(states[to].id()),
                );
            }

            let mut once = seed.clone();
            epsilon_closure(&states, &function, &mut once);
            let mut twice = once.clone();
            epsilon_closure(&states, &function, &mut twice);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_step_after_verdict_changes_nothing(word in "[ab]{0,6}") {
            let mut pda = a_star_b_star();
            pda.start_computation(&word);
            while !pda.is_finished() {
                pda.step();
            }
            let verdict = pda.verdict();
            let membership = pda.as_pushdown().unwrap().membership().to_vec();

            pda.step();

            prop_assert_eq!(pda.verdict(), verdict);
            prop_assert_eq!(pda.as_pushdown().unwrap().membership(), membership.as_slice());
        }
    }
}
