//! This module provides the `Runner`, the host-side controller that drives a shared
//! automaton the way a step/restart button panel does: a submitted word starts a
//! computation, a step press performs up to `step_size` steps, and restart replays the word.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::shared::SharedAutomaton;
use crate::types::{AutomatonError, Verdict, DEFAULT_STEP_SIZE, MAX_EXECUTION_STEPS};

/// The number of steps performed per step request. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "usize")]
pub struct StepSize(NonZeroUsize);

impl StepSize {
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_STEP_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for StepSize {
    type Error = AutomatonError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(StepSize)
            .ok_or_else(|| AutomatonError::InvalidStepSize(value.to_string()))
    }
}

impl FromStr for StepSize {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| AutomatonError::InvalidStepSize(s.to_string()))
            .and_then(StepSize::try_from)
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings for a `Runner`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Steps performed by each step request.
    pub step_size: StepSize,
    /// Upper bound on the steps performed by `Runner::run`.
    pub max_steps: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            step_size: StepSize::default(),
            max_steps: MAX_EXECUTION_STEPS,
        }
    }
}

impl RunnerConfig {
    /// Reads a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, AutomatonError> {
        serde_json::from_str(json).map_err(|e| AutomatonError::ValidationError(e.to_string()))
    }
}

pub struct Runner {
    automaton: SharedAutomaton,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(automaton: SharedAutomaton) -> Self {
        Self::with_config(automaton, RunnerConfig::default())
    }

    pub fn with_config(automaton: SharedAutomaton, config: RunnerConfig) -> Self {
        Self { automaton, config }
    }

    pub fn automaton(&self) -> &SharedAutomaton {
        &self.automaton
    }

    pub fn step_size(&self) -> StepSize {
        self.config.step_size
    }

    pub fn set_step_size(&mut self, step_size: StepSize) {
        self.config.step_size = step_size;
    }

    /// Parses a step size typed by the user. On invalid input the previous step size is
    /// kept; either way the step size now in force is returned for redisplay.
    pub fn set_step_size_text(&mut self, text: &str) -> StepSize {
        match text.parse() {
            Ok(step_size) => self.config.step_size = step_size,
            Err(e) => debug!(error = %e, kept = %self.config.step_size, "step size rejected"),
        }
        self.config.step_size
    }

    /// Starts a computation on a submitted word. A word with a character above U+00FF is
    /// refused with `InvalidKey` and the running computation is kept.
    pub fn submit_word(&self, word: &str) -> Result<Verdict, AutomatonError> {
        self.automaton.with(|a| -> Result<Verdict, AutomatonError> {
            a.start_computation_text(word)?;
            Ok(a.verdict())
        })?
    }

    /// Performs up to `step_size` steps, stopping early once the computation finishes.
    ///
    /// Returns the number of steps actually attempted. A finished computation is left alone.
    pub fn press_step(&self) -> Result<usize, AutomatonError> {
        let step_size = self.config.step_size.get();
        self.automaton.with(|a| {
            let mut taken = 0;
            while taken < step_size && !a.is_finished() && a.word().is_some() {
                a.step();
                taken += 1;
            }
            taken
        })
    }

    pub fn press_restart(&self) -> Result<Verdict, AutomatonError> {
        self.automaton.with(|a| {
            a.restart_computation();
            a.verdict()
        })
    }

    /// Steps until the computation finishes or `max_steps` steps were attempted.
    ///
    /// Returns `Verdict::Unknown` if the bound was reached first.
    pub fn run(&self) -> Result<Verdict, AutomatonError> {
        let max_steps = self.config.max_steps;
        self.automaton.with(|a| {
            for _ in 0..max_steps {
                if a.is_finished() || a.word().is_none() {
                    break;
                }
                a.step();
            }
            a.verdict()
        })
    }
}
