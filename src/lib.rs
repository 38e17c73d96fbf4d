//! This crate provides the execution engine of an automaton simulator.
//! It models states and transition tables, steps non-deterministic pushdown automata
//! (epsilon closure included) and single-tape Turing machines one symbol at a time,
//! and offers the editing, sharing and stepping controls a host application drives.

pub mod automaton;
pub mod editor;
pub mod function;
pub mod presets;
pub mod pushdown;
pub mod runner;
pub mod shared;
pub mod snapshot;
pub mod state;
pub mod tuple;
pub mod turing;
pub mod types;

/// Re-exports the automaton and its computation types from the automaton module.
pub use automaton::{Automaton, Kind, Run};
/// Re-exports the transition label editor.
pub use editor::{Key, TransitionEditor, TuringLabel};
/// Re-exports `Mode` and `TransitionFunction` from the function module.
pub use function::{Mode, TransitionFunction};
/// Re-exports `Preset`, `PresetInfo`, `PresetManager`, and `PRESETS` from the presets module.
pub use presets::{Preset, PresetInfo, PresetManager, PRESETS};
/// Re-exports the pushdown configuration and the `epsilon_closure` function.
pub use pushdown::{epsilon_closure, PushdownConfig};
/// Re-exports the `Runner` stepping controller and its settings.
pub use runner::{Runner, RunnerConfig, StepSize};
/// Re-exports the `SharedAutomaton` handle from the shared module.
pub use shared::SharedAutomaton;
/// Re-exports the renderer read model from the snapshot module.
pub use snapshot::{Snapshot, TapeView};
/// Re-exports `Position`, `State`, and `StateId` from the state module.
pub use state::{Position, State, StateId};
/// Re-exports the `TransitionTuple` struct from the tuple module.
pub use tuple::TransitionTuple;
/// Re-exports the Turing machine configuration from the turing module.
pub use turing::TuringConfig;
/// Re-exports the shared symbol, verdict and error types from the types module.
pub use types::{
    char_symbol, symbol_label, word_from_str, AutomatonError, Direction, Phase, Symbol, Verdict,
    BLANK, DEFAULT_STEP_SIZE, EPSILON, EPSILON_LABEL, MAX_EXECUTION_STEPS,
};
