use crate::automaton::Automaton;
use crate::function::TransitionFunction;
use crate::state::{Position, State};
use crate::tuple::TransitionTuple;
use crate::types::{AutomatonError, Direction, BLANK, EPSILON};

/// A named automaton that can be built on demand.
///
/// Every build creates fresh states, so two automata built from the same preset never share
/// state identities.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<Automaton, AutomatonError>,
}

lazy_static::lazy_static! {
    pub static ref PRESETS: Vec<Preset> = vec![
        Preset {
            name: "pda-a-star-b-star",
            description: "Accepts a*b* using an epsilon move between two accepting states",
            build: a_star_b_star,
        },
        Preset {
            name: "nfa-ends-with-ab",
            description: "Accepts words over {a, b} that end with ab",
            build: ends_with_ab,
        },
        Preset {
            name: "tm-unary-increment",
            description: "Appends a 1 to a unary number",
            build: unary_increment,
        },
        Preset {
            name: "tm-binary-complement",
            description: "Flips every bit of a binary word",
            build: binary_complement,
        },
    ];
}

/// Summary information about a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetInfo {
    pub index: usize,
    pub name: &'static str,
    pub description: &'static str,
    pub state_count: usize,
    pub transition_count: usize,
}

pub struct PresetManager;

impl PresetManager {
    pub fn count() -> usize {
        PRESETS.len()
    }

    pub fn list_names() -> Vec<&'static str> {
        PRESETS.iter().map(|preset| preset.name).collect()
    }

    /// Builds a fresh automaton from the preset with the given name.
    pub fn build(name: &str) -> Result<Automaton, AutomatonError> {
        let preset = PRESETS
            .iter()
            .find(|preset| preset.name == name)
            .ok_or_else(|| AutomatonError::ValidationError(format!("Preset '{}' not found", name)))?;
        (preset.build)()
    }

    pub fn build_by_index(index: usize) -> Result<Automaton, AutomatonError> {
        let preset = PRESETS.get(index).ok_or_else(|| {
            AutomatonError::ValidationError(format!("Preset index {} out of range", index))
        })?;
        (preset.build)()
    }

    pub fn get_info(index: usize) -> Result<PresetInfo, AutomatonError> {
        let automaton = Self::build_by_index(index)?;
        let preset = &PRESETS[index];

        Ok(PresetInfo {
            index,
            name: preset.name,
            description: preset.description,
            state_count: automaton.states().len(),
            transition_count: automaton.function().len(),
        })
    }

    /// Returns the indices of presets whose name contains `query`, ignoring case.
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        PRESETS
            .iter()
            .enumerate()
            .filter(|(_, preset)| preset.name.contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}

fn a_star_b_star() -> Result<Automaton, AutomatonError> {
    let start = State::at("start", true, Position::new(100, 100));
    let q1 = State::at("q1", true, Position::new(250, 100));
    let (s, q) = (start.id(), q1.id());

    let mut function = TransitionFunction::non_deterministic();
    function.add_transition(TransitionTuple::with_letter(s, b'a'), TransitionTuple::state(s));
    function.add_transition(TransitionTuple::with_letter(s, EPSILON), TransitionTuple::state(q));
    function.add_transition(TransitionTuple::with_letter(q, b'b'), TransitionTuple::state(q));

    Automaton::pushdown_with(vec![start, q1], s, function)
}

fn ends_with_ab() -> Result<Automaton, AutomatonError> {
    let q0 = State::at("q0", false, Position::new(100, 100));
    let q1 = State::at("q1", false, Position::new(250, 100));
    let q2 = State::at("q2", true, Position::new(400, 100));
    let (a, b, c) = (q0.id(), q1.id(), q2.id());

    let mut function = TransitionFunction::non_deterministic();
    function.add_transition(TransitionTuple::with_letter(a, b'a'), TransitionTuple::state(a));
    function.add_transition(TransitionTuple::with_letter(a, b'b'), TransitionTuple::state(a));
    function.add_transition(TransitionTuple::with_letter(a, b'a'), TransitionTuple::state(b));
    function.add_transition(TransitionTuple::with_letter(b, b'b'), TransitionTuple::state(c));

    Automaton::pushdown_with(vec![q0, q1, q2], a, function)
}

fn turing_states() -> [State; 3] {
    [
        State::at("start", false, Position::new(100, 100)),
        State::at("accept", true, Position::new(250, 50)),
        State::at("reject", false, Position::new(250, 150)),
    ]
}

fn unary_increment() -> Result<Automaton, AutomatonError> {
    let states = turing_states();
    let (s, acc, rej) = (states[0].id(), states[1].id(), states[2].id());

    let mut function = TransitionFunction::deterministic();
    function.add_transition(
        TransitionTuple::with_letter(s, b'1'),
        TransitionTuple::with_move(s, b'1', Direction::Right),
    );
    function.add_transition(
        TransitionTuple::with_letter(s, BLANK),
        TransitionTuple::with_move(acc, b'1', Direction::Right),
    );

    Automaton::turing_with(states.into(), s, acc, rej, function)
}

fn binary_complement() -> Result<Automaton, AutomatonError> {
    let states = turing_states();
    let (s, acc, rej) = (states[0].id(), states[1].id(), states[2].id());

    let mut function = TransitionFunction::deterministic();
    function.add_transition(
        TransitionTuple::with_letter(s, b'0'),
        TransitionTuple::with_move(s, b'1', Direction::Right),
    );
    function.add_transition(
        TransitionTuple::with_letter(s, b'1'),
        TransitionTuple::with_move(s, b'0', Direction::Right),
    );
    function.add_transition(
        TransitionTuple::with_letter(s, BLANK),
        TransitionTuple::with_move(acc, BLANK, Direction::Left),
    );

    Automaton::turing_with(states.into(), s, acc, rej, function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    fn run(name: &str, word: &str) -> Automaton {
        let mut automaton = PresetManager::build(name).unwrap();
        automaton.start_computation(word);
        while !automaton.is_finished() {
            automaton.step();
        }
        automaton
    }

    #[test]
    fn test_every_preset_builds() {
        assert_eq!(PresetManager::count(), 4);
        for name in PresetManager::list_names() {
            assert!(PresetManager::build(name).is_ok(), "{} failed to build", name);
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            PresetManager::build("missing"),
            Err(AutomatonError::ValidationError(_))
        ));
        assert!(PresetManager::build_by_index(99).is_err());
    }

    #[test]
    fn test_builds_are_independent() {
        let first = PresetManager::build("nfa-ends-with-ab").unwrap();
        let second = PresetManager::build("nfa-ends-with-ab").unwrap();

        assert_ne!(first.start_state(), second.start_state());
    }

    #[test]
    fn test_get_info() {
        let info = PresetManager::get_info(1).unwrap();

        assert_eq!(info.name, "nfa-ends-with-ab");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 4);
    }

    #[test]
    fn test_search() {
        assert_eq!(PresetManager::search("TM-"), vec![2, 3]);
        assert!(PresetManager::search("nothing").is_empty());
    }

    #[test]
    fn test_ends_with_ab() {
        assert_eq!(run("nfa-ends-with-ab", "bab").verdict(), Verdict::Accept);
        assert_eq!(run("nfa-ends-with-ab", "abab").verdict(), Verdict::Accept);
        assert_eq!(run("nfa-ends-with-ab", "aba").verdict(), Verdict::Reject);
        assert_eq!(run("nfa-ends-with-ab", "").verdict(), Verdict::Reject);
    }

    #[test]
    fn test_binary_complement() {
        let tm = run("tm-binary-complement", "1100");

        assert_eq!(tm.verdict(), Verdict::Accept);
        assert_eq!(&tm.as_turing().unwrap().tape()[..4], b"0011");
        assert_eq!(run("tm-binary-complement", "12").verdict(), Verdict::Reject);
    }
}
