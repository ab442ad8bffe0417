// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Assembled Pipeline — Value Wiring (C6)
//!
//! Glues a compiled `Structure`'s data items together via listeners: one
//! per workflow-input → child-input edge, one per child-output →
//! child-input edge, and one per child-output → workflow-output edge.
//! Wiring also primes already-bound workflow inputs into freshly attached
//! child inputs (§4.6) and updates the destination module's state machine
//! after every propagated write.

use crate::data::{InputBag, OutputBag};
use crate::error::PipelineError;
use crate::module::ModuleInstance;
use crate::structure::{LinkSource, LinkTarget, Structure};
use crate::value_objects::{Alias, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A compiled structure with its child items wired for value propagation
/// and a pair of workflow-level item bags the outer caller reads/writes.
pub struct AssembledPipeline {
    pub structure: Arc<Structure>,
    pub modules: HashMap<Alias, Arc<ModuleInstance>>,
    pub workflow_inputs: Arc<InputBag>,
    pub workflow_outputs: Arc<OutputBag>,
}

impl AssembledPipeline {
    /// Builds the workflow-level bags and wires every listener described
    /// by `structure`. Re-entrant: a new `AssembledPipeline` gets entirely
    /// fresh items and listener lists, so nothing from a previous assembly
    /// leaks in (§4.6 re-entrancy note) — assembly only ever happens once
    /// per instance, at construction.
    pub fn assemble(structure: Structure, modules: HashMap<Alias, Arc<ModuleInstance>>) -> Result<Self, PipelineError> {
        let workflow_inputs = Arc::new(InputBag::from_schemas(
            structure.workflow_input_links.iter().map(|(name, link)| (name.clone(), link.schema.clone())),
        ));
        let workflow_outputs = Arc::new(OutputBag::from_schemas(
            structure.workflow_output_links.iter().map(|(name, link)| (name.clone(), link.schema.clone())),
        ));

        // Child input <- source (workflow input, or a sibling's output).
        for ((alias, port), link) in &structure.module_input_links {
            let dest = Arc::clone(modules.get(alias).ok_or_else(|| {
                PipelineError::InvariantViolation(format!("module input link for unknown alias '{alias}'"))
            })?);
            let port = port.clone();

            match &link.source {
                LinkSource::WorkflowInput(name) => {
                    let source_item = workflow_inputs.get(name).ok_or_else(|| {
                        PipelineError::MissingBinding(format!("workflow input '{name}'"))
                    })?;
                    wire(&source_item, Arc::clone(&dest), port);
                }
                LinkSource::ModuleOutput(src_alias, src_port) => {
                    let src_instance = modules.get(src_alias).ok_or_else(|| {
                        PipelineError::InvariantViolation(format!("module output link from unknown alias '{src_alias}'"))
                    })?;
                    let source_item = src_instance.output_bag.get(src_port).ok_or_else(|| {
                        PipelineError::UnknownPort(format!("{src_alias}.{src_port}"))
                    })?;
                    wire(&source_item, Arc::clone(&dest), port);
                }
            }
        }

        // Child output -> workflow output.
        for ((alias, port), link) in &structure.module_output_links {
            let src_instance = modules.get(alias).ok_or_else(|| {
                PipelineError::InvariantViolation(format!("module output link for unknown alias '{alias}'"))
            })?;
            let source_item = src_instance.output_bag.get(port).ok_or_else(|| {
                PipelineError::UnknownPort(format!("{alias}.{port}"))
            })?;

            for target in &link.targets {
                if let LinkTarget::WorkflowOutput(name) = target {
                    let dest_item = workflow_outputs.get(name).ok_or_else(|| {
                        PipelineError::MissingBinding(format!("workflow output '{name}'"))
                    })?;
                    let current = source_item.get();
                    source_item.add_listener(Arc::new(move |v: &Value| dest_item.set(v.clone())));
                    if let Some(v) = current {
                        let dest_item = workflow_outputs.get(name).expect("looked up above");
                        dest_item.set(v)?;
                    }
                }
            }
        }

        Ok(Self {
            structure: Arc::new(structure),
            modules,
            workflow_inputs,
            workflow_outputs,
        })
    }
}

/// Wires `source_item` to write into `dest`'s `port` input whenever it
/// changes, recomputing `dest`'s input-validity state after every write,
/// and primes the current value immediately if one is already present.
fn wire(source_item: &Arc<crate::data::DataItem>, dest: Arc<ModuleInstance>, port: String) {
    // Prime first, before `dest`/`port` are moved into the listener below.
    if let Some(v) = source_item.get() {
        if let Some(item) = dest.input_bag.get(&port) {
            let _ = item.set(v);
            dest.state.on_inputs_changed(dest.input_bag.all_valid());
        }
    }

    source_item.add_listener(Arc::new(move |v: &Value| {
        let item = dest.input_bag.get(&port).ok_or_else(|| PipelineError::UnknownPort(port.clone()))?;
        item.set(v.clone())?;
        dest.state.on_inputs_changed(dest.input_bag.all_valid());
        Ok(())
    }));
}
