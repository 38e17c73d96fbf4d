//! This module defines the `TuringConfig`, the tape-rewriting configuration of a single-tape
//! deterministic Turing machine. It handles tape growth, head movements and the accept and
//! reject markers.

use tracing::{debug, trace};

use crate::automaton::{Run, Tables};
use crate::state::{State, StateId};
use crate::tuple::TransitionTuple;
use crate::types::{symbol_label, Direction, Symbol, Verdict, BLANK};

const KIND: &str = "turing";

/// The configuration of a Turing machine's computation.
///
/// Cells beyond the end of `tape` are implicitly blank. The head never moves below cell 0,
/// and the tape grows by one blank cell whenever the head reaches its end.
#[derive(Debug, Clone)]
pub struct TuringConfig {
    current: StateId,
    accept: StateId,
    reject: StateId,
    tape: Vec<Symbol>,
    head: usize,
}

impl TuringConfig {
    pub(crate) fn new(start: StateId, accept: StateId, reject: StateId) -> Self {
        Self {
            current: start,
            accept,
            reject,
            tape: Vec::new(),
            head: 0,
        }
    }

    /// Returns the current state of the machine.
    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn accept_state(&self) -> StateId {
        self.accept
    }

    pub fn reject_state(&self) -> StateId {
        self.reject
    }

    /// Returns the tape contents written so far.
    pub fn tape(&self) -> &[Symbol] {
        &self.tape
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the symbol under the head, which is blank past the end of the tape.
    pub fn symbol(&self) -> Symbol {
        self.tape.get(self.head).copied().unwrap_or(BLANK)
    }

    /// Renders the tape with blank cells shown as the epsilon label.
    pub fn tape_string(&self) -> String {
        self.tape.iter().copied().map(symbol_label).collect()
    }

    /// Returns the role of an accept or reject marker state.
    pub(crate) fn role_of(&self, id: StateId) -> Option<&'static str> {
        if id == self.accept {
            Some("accept")
        } else if id == self.reject {
            Some("reject")
        } else {
            None
        }
    }

    pub(crate) fn start(&mut self, tables: Tables<'_>, run: &mut Run) {
        self.current = tables.start;
        self.tape = run.word().map(<[Symbol]>::to_vec).unwrap_or_default();
        self.head = 0;
        self.sync_and_check(tables.states, run);
    }

    pub(crate) fn step(&mut self, tables: Tables<'_>, run: &mut Run) {
        if run.steppable(KIND).is_none() {
            return;
        }

        if self.head == self.tape.len() {
            self.tape.push(BLANK);
        }

        let read = self.tape[self.head];
        let from = TransitionTuple::with_letter(self.current, read);
        match tables.function.transition(&from).copied() {
            Some(to) => {
                self.tape[self.head] = to.symbol();
                self.current = to.state_id();
                match to.direction() {
                    Some(Direction::Left) => self.head = self.head.saturating_sub(1),
                    Some(Direction::Right) => self.head += 1,
                    None => {}
                }
                run.advance();
                trace!(
                    step = run.steps(),
                    read,
                    write = to.symbol(),
                    head = self.head,
                    "transition applied"
                );
            }
            None => {
                debug!(state = %self.current, read, "no transition applies, halting");
                run.decide(Verdict::Reject);
            }
        }

        self.sync_and_check(tables.states, run);
    }

    /// Marks the current state on the states' `current` flags, then decides the
    /// computation if the machine sits in its accept or reject state.
    fn sync_and_check(&self, states: &mut [State], run: &mut Run) {
        for state in states.iter_mut() {
            state.set_current(state.id() == self.current);
        }

        if self.current == self.accept {
            run.decide(Verdict::Accept);
        } else if self.current == self.reject {
            run.decide(Verdict::Reject);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::function::TransitionFunction;
    use crate::types::{AutomatonError, Phase};

    struct Machine {
        tm: Automaton,
        start: StateId,
        accept: StateId,
        reject: StateId,
    }

    fn machine(rules: &[(usize, u8, usize, u8, Direction)]) -> Machine {
        let states = vec![
            State::new("start", false),
            State::new("accept", true),
            State::new("reject", false),
            State::new("q3", false),
        ];
        let ids: Vec<_> = states.iter().map(State::id).collect();
        let mut function = TransitionFunction::deterministic();
        for &(from, read, to, write, dir) in rules {
            function.add_transition(
                TransitionTuple::with_letter(ids[from], read),
                TransitionTuple::with_move(ids[to], write, dir),
            );
        }
        let tm = Automaton::turing_with(states, ids[0], ids[1], ids[2], function).unwrap();
        Machine {
            tm,
            start: ids[0],
            accept: ids[1],
            reject: ids[2],
        }
    }

    fn unary_increment() -> Machine {
        machine(&[
            (0, b'1', 0, b'1', Direction::Right),
            (0, BLANK, 1, b'1', Direction::Right),
        ])
    }

    #[test]
    fn test_unary_increment() {
        let Machine { mut tm, accept, .. } = unary_increment();
        tm.start_computation("11");

        while !tm.is_finished() {
            tm.step();
        }

        let config = tm.as_turing().unwrap();
        assert_eq!(tm.accepts(), Some(true));
        assert_eq!(config.tape(), b"111");
        assert_eq!(config.current(), accept);
        assert_eq!(tm.steps_taken(), 3);
        assert_eq!(config.head(), 3);
    }

    #[test]
    fn test_start_configuration() {
        let Machine { mut tm, start, .. } = unary_increment();
        tm.start_computation("101");

        let config = tm.as_turing().unwrap();
        assert_eq!(config.current(), start);
        assert_eq!(config.tape(), b"101");
        assert_eq!(config.head(), 0);
        assert_eq!(config.symbol(), b'1');
        assert_eq!(tm.phase(), Phase::Running);
        assert_eq!(tm.current_states(), vec![start]);
    }

    #[test]
    fn test_no_transition_rejects() {
        let Machine { mut tm, start, .. } = unary_increment();
        tm.start_computation("0");

        tm.step();

        assert_eq!(tm.accepts(), Some(false));
        assert_eq!(tm.as_turing().unwrap().current(), start);
        assert_eq!(tm.steps_taken(), 0);
        assert_eq!(tm.as_turing().unwrap().tape(), b"0");
    }

    #[test]
    fn test_explicit_reject_state() {
        let Machine { mut tm, reject, .. } = machine(&[(0, b'0', 2, b'0', Direction::Right)]);
        tm.start_computation("0");

        tm.step();

        assert_eq!(tm.verdict(), Verdict::Reject);
        assert_eq!(tm.as_turing().unwrap().current(), reject);
        assert_eq!(tm.steps_taken(), 1);
    }

    #[test]
    fn test_head_clamped_at_zero() {
        let Machine { mut tm, .. } = machine(&[
            (0, b'a', 3, b'b', Direction::Left),
            (3, b'b', 1, b'c', Direction::Right),
        ]);
        tm.start_computation("a");

        tm.step();
        assert_eq!(tm.as_turing().unwrap().head(), 0);
        assert_eq!(tm.as_turing().unwrap().tape(), b"b");

        tm.step();
        assert_eq!(tm.accepts(), Some(true));
        assert_eq!(tm.as_turing().unwrap().tape(), b"c");
        assert_eq!(tm.as_turing().unwrap().head(), 1);
    }

    #[test]
    fn test_empty_tape_reads_blank() {
        let Machine { mut tm, .. } = unary_increment();
        tm.start_computation("");

        assert_eq!(tm.as_turing().unwrap().symbol(), BLANK);
        tm.step();

        assert_eq!(tm.accepts(), Some(true));
        assert_eq!(tm.as_turing().unwrap().tape_string(), "1");
    }

    #[test]
    fn test_tape_string_shows_blanks() {
        let Machine { mut tm, .. } = machine(&[
            (0, b'x', 3, b'x', Direction::Right),
            (3, BLANK, 3, BLANK, Direction::Right),
        ]);
        tm.start_computation("x");
        tm.step();
        tm.step();

        assert_eq!(tm.as_turing().unwrap().tape_string(), "xε");
        assert_eq!(tm.phase(), Phase::Running);
    }

    #[test]
    fn test_start_in_marker_state_decides_immediately() {
        for (start, expected) in [(1, Some(true)), (2, Some(false))] {
            let states = vec![
                State::new("start", false),
                State::new("accept", true),
                State::new("reject", false),
            ];
            let ids: Vec<_> = states.iter().map(State::id).collect();
            let mut tm = Automaton::turing(states, ids[start], ids[1], ids[2]).unwrap();

            tm.start_computation("abc");

            assert_eq!(tm.accepts(), expected);
            assert_eq!(tm.steps_taken(), 0);
        }
    }

    #[test]
    fn test_accept_and_reject_must_differ() {
        let states = vec![State::new("start", false), State::new("halt", true)];
        let (start, halt) = (states[0].id(), states[1].id());

        let result = Automaton::turing(states, start, halt, halt);
        assert!(matches!(result, Err(AutomatonError::ValidationError(_))));
    }

    #[test]
    fn test_markers_cannot_be_removed() {
        let Machine {
            mut tm,
            accept,
            reject,
            ..
        } = unary_increment();

        assert_eq!(
            tm.remove_state(accept),
            Err(AutomatonError::ProtectedState {
                id: accept,
                role: "accept"
            })
        );
        assert_eq!(
            tm.remove_state(reject),
            Err(AutomatonError::ProtectedState {
                id: reject,
                role: "reject"
            })
        );
    }

    #[test]
    fn test_current_state_protected_while_running() {
        let Machine { mut tm, start, .. } = machine(&[(0, b'a', 3, b'a', Direction::Right)]);
        tm.start_computation("aa");
        tm.step();
        let q3 = tm.as_turing().unwrap().current();
        assert_ne!(q3, start);

        assert!(matches!(
            tm.remove_state(q3),
            Err(AutomatonError::ProtectedState { role: "current", .. })
        ));

        tm.step();
        assert!(tm.is_finished());
        assert!(tm.remove_state(q3).is_ok());
    }

    #[test]
    fn test_halts_within_bound() {
        // Walks right over a binary word flipping bits, accepting at the first blank.
        let Machine { mut tm, .. } = machine(&[
            (0, b'0', 0, b'1', Direction::Right),
            (0, b'1', 0, b'0', Direction::Right),
            (0, BLANK, 1, BLANK, Direction::Left),
        ]);
        let word = "0110";
        tm.start_computation(word);
        let bound = tm.states().len() * (word.len() + 1);

        for _ in 0..bound {
            if tm.is_finished() {
                break;
            }
            tm.step();
        }

        assert_eq!(tm.accepts(), Some(true));
        assert_eq!(&tm.as_turing().unwrap().tape()[..4], b"1001");
    }
}
