//! A handle that lets an editor and a running computation share one automaton. Every
//! operation holds the automaton's single lock for its whole duration.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::automaton::Automaton;
use crate::types::AutomatonError;

#[derive(Debug, Clone)]
pub struct SharedAutomaton {
    inner: Arc<Mutex<Automaton>>,
}

impl SharedAutomaton {
    pub fn new(automaton: Automaton) -> Self {
        Self {
            inner: Arc::new(Mutex::new(automaton)),
        }
    }

    /// Acquires the automaton's lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, Automaton>, AutomatonError> {
        self.inner.lock().map_err(|_| AutomatonError::LockPoisoned)
    }

    /// Runs `f` with exclusive access to the automaton.
    pub fn with<R>(&self, f: impl FnOnce(&mut Automaton) -> R) -> Result<R, AutomatonError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn start_computation(&self, word: impl AsRef<[u8]>) -> Result<(), AutomatonError> {
        self.with(|a| a.start_computation(word))
    }

    /// Starts a computation on typed text. See `Automaton::start_computation_text`.
    pub fn start_computation_text(&self, text: &str) -> Result<(), AutomatonError> {
        self.with(|a| a.start_computation_text(text))?
    }

    pub fn step(&self) -> Result<(), AutomatonError> {
        self.with(Automaton::step)
    }

    pub fn restart_computation(&self) -> Result<(), AutomatonError> {
        self.with(Automaton::restart_computation)
    }

    /// Returns a copy of the automaton as it is now.
    pub fn clone_inner(&self) -> Result<Automaton, AutomatonError> {
        self.with(|a| a.clone())
    }
}
