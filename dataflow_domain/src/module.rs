// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Contract (C4)
//!
//! The abstract compute unit every atomic or pipeline module implements:
//! typed input/output schemas and a suspendable `process`. Atomic modules
//! implement `process` directly; pipeline modules delegate to the compiler
//! (C5) and the assembled pipeline (C6).

use crate::data::{InputBag, OutputBag};
use crate::error::PipelineError;
use crate::state::ModuleStateMachine;
use crate::value_objects::{Address, Alias, Schema, StageNumber};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A unit of computation with typed input and output ports.
///
/// Implementors MUST NOT mutate `inputs` from `process` — the contract is
/// read inputs, write outputs, complete.
#[async_trait]
pub trait Module: Send + Sync {
    fn input_schema(&self) -> &HashMap<String, Schema>;
    fn output_schema(&self) -> &HashMap<String, Schema>;

    async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError>;

    fn doc(&self) -> Option<&str> {
        None
    }

    fn is_pipeline(&self) -> bool {
        false
    }
}

/// Produces a `Module` instance from its normalized config. One factory per
/// registered type name (§4.3); resolving a pipeline type name yields a
/// factory that manufactures a module delegating to a compiled `Structure`.
pub trait ModuleFactory: Send + Sync {
    fn create(
        &self,
        config: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Arc<dyn Module>, PipelineError>;
}

/// Runtime identity and wiring metadata for a module instance within a
/// compiled structure — the parts of C4 that are not the compute contract
/// itself (alias, address, connection map, assigned stage).
pub struct ModuleInstance {
    pub alias: Alias,
    pub address: Address,
    pub module_type: String,
    pub module: Arc<dyn Module>,
    pub input_bag: Arc<InputBag>,
    pub output_bag: Arc<OutputBag>,
    execution_stage: AtomicU32,
    pub state: ModuleStateMachine,
}

impl ModuleInstance {
    pub fn new(
        alias: Alias,
        address: Address,
        module_type: String,
        module: Arc<dyn Module>,
        execution_stage: StageNumber,
    ) -> Self {
        let input_bag = Arc::new(InputBag::from_schemas(
            module.input_schema().iter().map(|(k, v)| (k.clone(), v.clone())),
        ));
        let output_bag = Arc::new(OutputBag::from_schemas(
            module.output_schema().iter().map(|(k, v)| (k.clone(), v.clone())),
        ));
        Self {
            alias,
            address,
            module_type,
            module,
            input_bag,
            output_bag,
            execution_stage: AtomicU32::new(execution_stage.get()),
            state: ModuleStateMachine::new(),
        }
    }

    /// The stage the compiler assigned this module to. Set once by
    /// `compiler::compile`; atomic only so the struct can be shared via
    /// `Arc` without an outer lock.
    pub fn execution_stage(&self) -> StageNumber {
        StageNumber::new(self.execution_stage.load(Ordering::SeqCst))
    }

    pub(crate) fn set_execution_stage(&self, stage: StageNumber) {
        self.execution_stage.store(stage.get(), Ordering::SeqCst);
    }

    /// Runs this module's `process`, driving its state machine through
    /// `RESULTS_INCOMING` to either `RESULTS_READY` or back to `STALE`
    /// (with outputs cleared) on failure, per §4.7.
    pub async fn run(&self) -> Result<(), PipelineError> {
        self.state.on_process_start()?;
        self.input_bag.lock_writes();
        let result = self.module.process(&self.input_bag, &self.output_bag).await;
        self.input_bag.unlock_writes();
        match result {
            Ok(()) => {
                self.state.on_process_success();
                Ok(())
            }
            Err(e) => {
                self.output_bag.clear();
                self.state.on_process_failure();
                Err(e)
            }
        }
    }
}
