// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Facade (§6 Engine API)
//!
//! `create_workflow` → compile + assemble; `inputs`/`outputs` expose the
//! workflow-level item bags directly; `process` drives the stage
//! scheduler (C8) against the configured executor; `state` aggregates
//! every child's computed state per §4.7; `structure_details`/`to_details`
//! delegate to the introspection module (C9).

use crate::assembly::AssembledPipeline;
use crate::compiler::{compile, CompileOptions};
use crate::data::{InputBag, OutputBag};
use crate::error::PipelineError;
use crate::executor::{run_stages, CancellationToken, Executor};
use crate::introspection::{self, ModuleDetails, StructureDetails};
use crate::registry::ModuleRegistry;
use crate::state::ModuleState;
use crate::value_objects::{Address, Alias};
use std::sync::Arc;

pub struct Pipeline {
    assembled: AssembledPipeline,
    registry: Arc<dyn ModuleRegistry>,
}

impl Pipeline {
    /// `create_workflow(type, alias?)`: resolves the named pipeline
    /// descriptor from `registry`, compiles it (C5), and assembles the
    /// wiring (C6). The returned pipeline's inputs are all unset; `state`
    /// is `STALE` for every child until inputs are supplied.
    pub fn create_workflow(
        type_name: &str,
        alias: Option<&str>,
        registry: Arc<dyn ModuleRegistry>,
    ) -> Result<Self, PipelineError> {
        let descriptor = registry.resolve_pipeline(type_name)?;
        let root_alias = Alias::new(alias.unwrap_or(type_name));
        let address = Address::root().child(&root_alias);
        let compiled = compile(&address, &descriptor, registry.as_ref(), CompileOptions::default())?;
        let assembled = AssembledPipeline::assemble(compiled.structure, compiled.modules)?;
        Ok(Self { assembled, registry })
    }

    pub fn inputs(&self) -> &InputBag {
        &self.assembled.workflow_inputs
    }

    pub fn outputs(&self) -> &OutputBag {
        &self.assembled.workflow_outputs
    }

    pub fn registry(&self) -> &Arc<dyn ModuleRegistry> {
        &self.registry
    }

    /// Runs every stage in order via `executor` (§4.8), stopping early and
    /// returning `Cancelled` if `cancel` fires between stages.
    pub async fn process(&self, executor: &dyn Executor, cancel: Option<&CancellationToken>) -> Result<(), PipelineError> {
        run_stages(&self.assembled.structure, &self.assembled.modules, executor, cancel).await
    }

    /// The pipeline's overall computed state: `RESULTS_READY` only if
    /// every child is; `STALE` if any child is, taking priority over
    /// partial progress so a failed/incomplete run is never reported as
    /// more advanced than it is.
    pub fn state(&self) -> ModuleState {
        let mut worst = ModuleState::ResultsReady;
        let mut any_stale = false;
        for instance in self.assembled.modules.values() {
            let s = instance.state.current();
            if s == ModuleState::Stale {
                any_stale = true;
            }
            if s < worst {
                worst = s;
            }
        }
        if any_stale {
            ModuleState::Stale
        } else {
            worst
        }
    }

    pub fn structure_details(&self) -> StructureDetails {
        introspection::structure_details(&self.assembled)
    }

    pub fn to_details(&self, alias: &Alias) -> Option<ModuleDetails> {
        self.assembled.modules.get(alias).map(|instance| introspection::module_details(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModuleDescriptorDto, PipelineDescriptorDto};
    use crate::data::OutputBag;
    use crate::module::{Module, ModuleFactory};
    use crate::value_objects::{Schema, Value, ValueType};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct Passthrough;

    #[async_trait]
    impl Module for Passthrough {
        fn input_schema(&self) -> &HashMap<String, Schema> {
            static SCHEMA: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| {
                let mut m = HashMap::new();
                m.insert("x".to_string(), Schema::new(ValueType::Integer));
                m
            })
        }
        fn output_schema(&self) -> &HashMap<String, Schema> {
            static SCHEMA: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| {
                let mut m = HashMap::new();
                m.insert("x".to_string(), Schema::new(ValueType::Integer));
                m
            })
        }
        async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
            let v = inputs.get("x").and_then(|i| i.get()).unwrap_or(Value::Integer(0));
            let mut values = HashMap::new();
            values.insert("x".to_string(), v);
            outputs.set_values(values)
        }
    }

    struct PassthroughFactory;
    impl ModuleFactory for PassthroughFactory {
        fn create(&self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
            Ok(Arc::new(Passthrough))
        }
    }

    struct TestExecutor;
    #[async_trait]
    impl Executor for TestExecutor {
        async fn run_all(&self, modules: Vec<Arc<crate::module::ModuleInstance>>) -> Result<(), PipelineError> {
            let mut errors = Vec::new();
            for m in &modules {
                if let Err(e) = m.run().await {
                    errors.push(format!("{}: {e}", m.alias));
                }
            }
            if errors.is_empty() {
                Ok(())
            } else {
                Err(PipelineError::StageFailed(errors.join(", ")))
            }
        }
    }

    struct TestRegistry;
    impl ModuleRegistry for TestRegistry {
        fn resolve(&self, type_name: &str) -> Result<Arc<dyn ModuleFactory>, PipelineError> {
            match type_name {
                "passthrough" => Ok(Arc::new(PassthroughFactory)),
                other => Err(PipelineError::UnknownType(other.to_string())),
            }
        }
        fn register_pipeline(&self, _name: &str, _descriptor: PipelineDescriptorDto) -> Result<(), PipelineError> {
            Ok(())
        }
        fn has_type(&self, type_name: &str) -> bool {
            type_name == "passthrough"
        }
        fn resolve_pipeline(&self, type_name: &str) -> Result<PipelineDescriptorDto, PipelineError> {
            if type_name != "identity" {
                return Err(PipelineError::UnknownType(type_name.to_string()));
            }
            Ok(PipelineDescriptorDto {
                modules: vec![ModuleDescriptorDto {
                    module_type: "passthrough".to_string(),
                    module_alias: Some("p".to_string()),
                    module_config: serde_json::Map::new(),
                    input_links: HashMap::new(),
                }],
                input_aliases: HashMap::new(),
                output_aliases: {
                    let mut m = HashMap::new();
                    m.insert("p__x".to_string(), "result".to_string());
                    m
                },
                module_type_name: None,
                doc: None,
            })
        }
    }

    #[tokio::test]
    async fn end_to_end_single_module_run_propagates_output() {
        let registry: Arc<dyn ModuleRegistry> = Arc::new(TestRegistry);
        let pipeline = Pipeline::create_workflow("identity", None, registry).unwrap();

        pipeline.inputs().get("p__x").unwrap().set(Value::Integer(42)).unwrap();
        pipeline.process(&TestExecutor, None).await.unwrap();

        assert_eq!(pipeline.outputs().get("result").unwrap().get(), Some(Value::Integer(42)));
        assert_eq!(pipeline.state(), ModuleState::ResultsReady);
    }

    #[tokio::test]
    async fn unset_input_leaves_pipeline_stale() {
        let registry: Arc<dyn ModuleRegistry> = Arc::new(TestRegistry);
        let pipeline = Pipeline::create_workflow("identity", None, registry).unwrap();
        pipeline.process(&TestExecutor, None).await.unwrap();
        assert_eq!(pipeline.state(), ModuleState::Stale);
    }
}
