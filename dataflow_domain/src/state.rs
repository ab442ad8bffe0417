// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # State Machine & Change Events (C7)
//!
//! Per-module state transitions. Variant declaration order doubles as the
//! state ordering `STALE < INPUTS_READY < RESULTS_INCOMING < RESULTS_READY`,
//! so "computed state is the max of the transition state and a
//! recomputation over current validity" (§4.7) is a plain `Ord::max`.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleState {
    Stale,
    InputsReady,
    ResultsIncoming,
    ResultsReady,
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ModuleState::Stale => "STALE",
            ModuleState::InputsReady => "INPUTS_READY",
            ModuleState::ResultsIncoming => "RESULTS_INCOMING",
            ModuleState::ResultsReady => "RESULTS_READY",
        };
        write!(f, "{s}")
    }
}

/// Tracks one module's lifecycle state, enforcing the transition table of
/// §4.7. Every input-validity recomputation immediately downgrades a
/// `RESULTS_READY` module to `STALE` on any input write, per the resolved
/// open question in the original design notes.
pub struct ModuleStateMachine {
    state: Mutex<ModuleState>,
}

impl ModuleStateMachine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ModuleState::Stale),
        }
    }

    pub fn current(&self) -> ModuleState {
        *self.state.lock().expect("module state lock poisoned")
    }

    /// Reacts to an input write: inputs becoming fully valid promotes a
    /// `STALE` module to `INPUTS_READY`; inputs becoming invalid (or any
    /// input changing at all while `RESULTS_READY`) downgrades to `STALE`.
    pub fn on_inputs_changed(&self, inputs_valid: bool) {
        let mut state = self.state.lock().expect("module state lock poisoned");
        *state = match (*state, inputs_valid) {
            (ModuleState::Stale, true) => ModuleState::InputsReady,
            (ModuleState::InputsReady, false) => ModuleState::Stale,
            (ModuleState::ResultsReady, _) => ModuleState::Stale,
            (other, _) => other,
        };
    }

    pub fn on_process_start(&self) -> Result<(), PipelineError> {
        let mut state = self.state.lock().expect("module state lock poisoned");
        if *state != ModuleState::InputsReady {
            return Err(PipelineError::InvariantViolation(format!(
                "process started from state {state}, expected INPUTS_READY"
            )));
        }
        *state = ModuleState::ResultsIncoming;
        Ok(())
    }

    pub fn on_process_success(&self) {
        let mut state = self.state.lock().expect("module state lock poisoned");
        *state = ModuleState::ResultsReady;
    }

    pub fn on_process_failure(&self) {
        let mut state = self.state.lock().expect("module state lock poisoned");
        *state = ModuleState::Stale;
    }

    /// Computed state: the max of the transition-table state and a fresh
    /// recomputation over current input/output validity, so programmatic
    /// mutation between runs downgrades the module automatically.
    pub fn recompute(&self, inputs_valid: bool, outputs_valid: bool) -> ModuleState {
        let observed = if outputs_valid {
            ModuleState::ResultsReady
        } else if inputs_valid {
            ModuleState::InputsReady
        } else {
            ModuleState::Stale
        };
        let mut state = self.state.lock().expect("module state lock poisoned");
        if !inputs_valid {
            *state = ModuleState::Stale;
        } else {
            *state = (*state).max(observed);
        }
        *state
    }
}

impl Default for ModuleStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_ordering_matches_lifecycle() {
        assert!(ModuleState::Stale < ModuleState::InputsReady);
        assert!(ModuleState::InputsReady < ModuleState::ResultsIncoming);
        assert!(ModuleState::ResultsIncoming < ModuleState::ResultsReady);
    }

    #[test]
    fn full_success_cycle() {
        let sm = ModuleStateMachine::new();
        assert_eq!(sm.current(), ModuleState::Stale);
        sm.on_inputs_changed(true);
        assert_eq!(sm.current(), ModuleState::InputsReady);
        sm.on_process_start().unwrap();
        assert_eq!(sm.current(), ModuleState::ResultsIncoming);
        sm.on_process_success();
        assert_eq!(sm.current(), ModuleState::ResultsReady);
    }

    #[test]
    fn failure_resets_to_stale() {
        let sm = ModuleStateMachine::new();
        sm.on_inputs_changed(true);
        sm.on_process_start().unwrap();
        sm.on_process_failure();
        assert_eq!(sm.current(), ModuleState::Stale);
    }

    #[test]
    fn results_ready_downgrades_immediately_on_any_input_write() {
        let sm = ModuleStateMachine::new();
        sm.on_inputs_changed(true);
        sm.on_process_start().unwrap();
        sm.on_process_success();
        assert_eq!(sm.current(), ModuleState::ResultsReady);

        sm.on_inputs_changed(true);
        assert_eq!(sm.current(), ModuleState::Stale);
    }

    #[test]
    fn process_cannot_start_without_ready_inputs() {
        let sm = ModuleStateMachine::new();
        assert!(sm.on_process_start().is_err());
    }
}
