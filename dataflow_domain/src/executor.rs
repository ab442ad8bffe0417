// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Scheduler & Executor Contract (C8)
//!
//! `run_stages` implements the algorithm of §4.8 exactly; concrete
//! executors (cooperative, worker-pool) live in `dataflow-engine` since
//! they need a runtime. This module only needs the `Executor` trait and a
//! runtime-agnostic cancellation flag.

use crate::error::PipelineError;
use crate::module::ModuleInstance;
use crate::state::ModuleState;
use crate::structure::Structure;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap, clonable cancellation flag shared between a caller and an
/// in-flight `process` invocation. Not tied to any async runtime.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a batch of modules to completion and aggregates failures (§4.8).
/// Implementations MUST let every submitted module finish even if one
/// fails, then return `StageFailed` naming every failing alias.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run_all(&self, modules: Vec<Arc<ModuleInstance>>) -> Result<(), PipelineError>;
}

/// Drives a compiled `Structure` stage by stage against `modules`, per the
/// §4.8 algorithm. Returns `Cancelled` if `cancel` is observed between
/// stages; a stage already dispatched always runs to completion.
pub async fn run_stages(
    structure: &Structure,
    modules: &HashMap<crate::value_objects::Alias, Arc<ModuleInstance>>,
    executor: &dyn Executor,
    cancel: Option<&CancellationToken>,
) -> Result<(), PipelineError> {
    for stage in &structure.stages {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
        }

        let mut ready = Vec::new();
        for alias in stage {
            let instance = modules.get(alias).expect("compiler guarantees every stage alias has an instance");
            match instance.state.current() {
                ModuleState::ResultsReady => continue,
                ModuleState::ResultsIncoming => {
                    return Err(PipelineError::InvariantViolation(format!(
                        "module '{alias}' entered stage dispatch already RESULTS_INCOMING"
                    )));
                }
                ModuleState::InputsReady => ready.push(Arc::clone(instance)),
                ModuleState::Stale => continue,
            }
        }

        if ready.is_empty() {
            continue;
        }

        executor.run_all(ready).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancellation_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
