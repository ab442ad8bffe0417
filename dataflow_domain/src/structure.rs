// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Compiled Structure (C5, data shape)
//!
//! The flat arena the compiler (`compiler.rs`) produces: link nodes keyed
//! by structural identity rather than backpointers (per the "Cyclic object
//! graphs" design note) plus the derived stage assignment. This module only
//! holds the shape; `compiler::compile` builds it.

use crate::value_objects::{Alias, Schema, StageNumber, WorkflowId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct WorkflowInputLink {
    pub name: String,
    pub schema: Schema,
}

#[derive(Debug, Clone)]
pub struct WorkflowOutputLink {
    pub name: String,
    pub schema: Schema,
}

/// Where a `ModuleInputLink`'s value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    WorkflowInput(String),
    ModuleOutput(Alias, String),
}

#[derive(Debug, Clone)]
pub struct ModuleInputLink {
    pub module_alias: Alias,
    pub port_name: String,
    pub schema: Schema,
    pub source: LinkSource,
}

/// Where a `ModuleOutputLink`'s value is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    ModuleInput(Alias, String),
    WorkflowOutput(String),
}

#[derive(Debug, Clone)]
pub struct ModuleOutputLink {
    pub module_alias: Alias,
    pub port_name: String,
    pub schema: Schema,
    pub targets: Vec<LinkTarget>,
}

/// `{workflow_id, children[], data_flow_graph, execution_graph, stages[][]}`
/// from §3. `data_flow_graph` is represented as the link-node maps
/// themselves; `execution_graph` as an explicit edge list kept for
/// introspection and cycle diagnostics even though the compiler only needs
/// it transiently.
#[derive(Debug, Clone)]
pub struct Structure {
    pub workflow_id: WorkflowId,
    /// Child aliases in the order they were declared (insertion order is
    /// deterministic given ordered descriptor lists, per §4.5 step 6).
    pub children: Vec<Alias>,
    /// `(src, dst)` dependency edges: `dst` depends on `src` having run.
    pub execution_edges: Vec<(Alias, Alias)>,
    /// `stages[0]` is stage 1; `stages[k]` holds every child whose longest
    /// root-to-node path length is `k + 1`.
    pub stages: Vec<Vec<Alias>>,
    pub workflow_input_links: HashMap<String, WorkflowInputLink>,
    pub workflow_output_links: HashMap<String, WorkflowOutputLink>,
    pub module_input_links: HashMap<(Alias, String), ModuleInputLink>,
    pub module_output_links: HashMap<(Alias, String), ModuleOutputLink>,
}

impl Structure {
    pub fn stage_of(&self, alias: &Alias) -> Option<StageNumber> {
        self.stages
            .iter()
            .enumerate()
            .find(|(_, children)| children.contains(alias))
            .map(|(idx, _)| StageNumber::new(idx as u32 + 1))
    }

    pub fn workflow_input_schema(&self) -> HashMap<String, Schema> {
        self.workflow_input_links
            .iter()
            .map(|(name, link)| (name.clone(), link.schema.clone()))
            .collect()
    }

    pub fn workflow_output_schema(&self) -> HashMap<String, Schema> {
        self.workflow_output_links
            .iter()
            .map(|(name, link)| (name.clone(), link.schema.clone()))
            .collect()
    }
}
