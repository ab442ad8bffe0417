// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline-as-Module (C10, carrying out DESIGN.md's Open Question decision)
//!
//! Wraps a compiled `Structure` so a registered pipeline type can be used
//! as a child module inside an enclosing pipeline, recursing through the
//! same compiler (C5) and executor (C8) the top-level `Pipeline` facade
//! uses.

use async_trait::async_trait;
use dataflow_domain::assembly::AssembledPipeline;
use dataflow_domain::compiler::{compile, CompileOptions};
use dataflow_domain::data::{InputBag, OutputBag};
use dataflow_domain::executor::{run_stages, Executor};
use dataflow_domain::module::{Module, ModuleFactory};
use dataflow_domain::registry::ModuleRegistry;
use dataflow_domain::value_objects::{Address, Alias, Schema};
use dataflow_domain::PipelineError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct PipelineModule {
    assembled: AssembledPipeline,
    input_schema: HashMap<String, Schema>,
    output_schema: HashMap<String, Schema>,
    executor: Arc<dyn Executor>,
}

#[async_trait]
impl Module for PipelineModule {
    fn input_schema(&self) -> &HashMap<String, Schema> {
        &self.input_schema
    }

    fn output_schema(&self) -> &HashMap<String, Schema> {
        &self.output_schema
    }

    fn is_pipeline(&self) -> bool {
        true
    }

    async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
        let mut values = HashMap::new();
        for name in inputs.names() {
            if let Some(v) = inputs.get(name).and_then(|item| item.get()) {
                values.insert(name.clone(), v);
            }
        }
        self.assembled.workflow_inputs.set_values(values)?;

        run_stages(&self.assembled.structure, &self.assembled.modules, self.executor.as_ref(), None).await?;

        let mut out_values = HashMap::new();
        for name in self.assembled.workflow_outputs.names() {
            if let Some(v) = self.assembled.workflow_outputs.get(name).and_then(|item| item.get()) {
                out_values.insert(name.clone(), v);
            }
        }
        outputs.set_values(out_values)
    }
}

/// Manufactures a `PipelineModule` by compiling and assembling `descriptor`
/// against `registry` at creation time, so resolving a pipeline type name
/// twice yields two independent, freshly-wired instances (§4.6 re-entrancy).
pub struct PipelineModuleFactory {
    pub descriptor: dataflow_domain::config::PipelineDescriptorDto,
    pub registry: Arc<dyn ModuleRegistry>,
    pub executor: Arc<dyn Executor>,
}

impl ModuleFactory for PipelineModuleFactory {
    fn create(&self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
        let address = Address::root().child(&Alias::new(
            self.descriptor.module_type_name.clone().unwrap_or_else(|| "pipeline".to_string()),
        ));
        let compiled = compile(&address, &self.descriptor, self.registry.as_ref(), CompileOptions::default())?;
        let input_schema = compiled.structure.workflow_input_schema();
        let output_schema = compiled.structure.workflow_output_schema();
        let assembled = AssembledPipeline::assemble(compiled.structure, compiled.modules)?;
        Ok(Arc::new(PipelineModule {
            assembled,
            input_schema,
            output_schema,
            executor: Arc::clone(&self.executor),
        }))
    }
}
