// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Introspection (C9)
//!
//! Point-in-time snapshots of a module or an assembled pipeline's
//! structure, safe to take mid-run (everything here only reads, never
//! locks across a snapshot). Serializable so the CLI can print these as
//! JSON.

use crate::assembly::AssembledPipeline;
use crate::module::ModuleInstance;
use crate::structure::LinkTarget;
use crate::value_objects::{Alias, SchemaDto, Value};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct PortDetails {
    pub schema: SchemaDto,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleDetails {
    pub alias: String,
    pub address: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub is_pipeline: bool,
    pub state: String,
    pub execution_stage: u32,
    pub inputs: HashMap<String, PortDetails>,
    pub outputs: HashMap<String, PortDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// `"__parent__.<name>"` for a workflow input, `"alias.port"` for a sibling
/// output, matching §4.9 exactly.
pub fn source_ref(source: &crate::structure::LinkSource) -> String {
    match source {
        crate::structure::LinkSource::WorkflowInput(name) => format!("__parent__.{name}"),
        crate::structure::LinkSource::ModuleOutput(alias, port) => format!("{alias}.{port}"),
    }
}

fn sink_ref(target: &LinkTarget) -> String {
    match target {
        LinkTarget::ModuleInput(alias, port) => format!("{alias}.{port}"),
        LinkTarget::WorkflowOutput(name) => format!("__parent__.{name}"),
    }
}

pub fn module_details(instance: &ModuleInstance) -> ModuleDetails {
    let inputs = instance
        .input_bag
        .names()
        .iter()
        .map(|name| {
            let item = instance.input_bag.get(name).expect("name came from names()");
            (
                name.clone(),
                PortDetails {
                    schema: item.schema().to_serializable(),
                    value: item.get(),
                },
            )
        })
        .collect();
    let outputs = instance
        .output_bag
        .names()
        .iter()
        .map(|name| {
            let item = instance.output_bag.get(name).expect("name came from names()");
            (
                name.clone(),
                PortDetails {
                    schema: item.schema().to_serializable(),
                    value: item.get(),
                },
            )
        })
        .collect();

    ModuleDetails {
        alias: instance.alias.to_string(),
        address: instance.address.to_string(),
        module_type: instance.module_type.clone(),
        is_pipeline: instance.module.is_pipeline(),
        state: instance.state.current().to_string(),
        execution_stage: instance.execution_stage().get(),
        inputs,
        outputs,
        doc: instance.module.doc().map(str::to_string),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleConnections {
    pub module: ModuleDetails,
    pub input_connections: HashMap<String, String>,
    pub output_connections: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureDetails {
    pub workflow_id: String,
    pub modules: Vec<ModuleConnections>,
    pub workflow_input_connections: Vec<String>,
    pub workflow_output_connections: Vec<String>,
}

pub fn structure_details(pipeline: &AssembledPipeline) -> StructureDetails {
    let modules = pipeline
        .structure
        .children
        .iter()
        .map(|alias: &Alias| {
            let instance = &pipeline.modules[alias];
            let input_connections = instance
                .input_bag
                .names()
                .iter()
                .filter_map(|port| {
                    pipeline
                        .structure
                        .module_input_links
                        .get(&(alias.clone(), port.clone()))
                        .map(|link| (port.clone(), source_ref(&link.source)))
                })
                .collect();
            let output_connections = instance
                .output_bag
                .names()
                .iter()
                .filter_map(|port| {
                    pipeline
                        .structure
                        .module_output_links
                        .get(&(alias.clone(), port.clone()))
                        .map(|link| (port.clone(), link.targets.iter().map(sink_ref).collect()))
                })
                .collect();

            ModuleConnections {
                module: module_details(instance),
                input_connections,
                output_connections,
            }
        })
        .collect();

    StructureDetails {
        workflow_id: pipeline.structure.workflow_id.to_string(),
        modules,
        workflow_input_connections: pipeline.structure.workflow_input_links.keys().cloned().collect(),
        workflow_output_connections: pipeline.structure.workflow_output_links.keys().cloned().collect(),
    }
}
