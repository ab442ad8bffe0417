// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Structure Compiler (C5)
//!
//! Implements §4.5 end to end: instantiate children, allocate output links,
//! resolve input links (wiring workflow-level inputs and child-to-child
//! connections alike), add the synthetic root, assign stages by longest
//! path, and detect cycles. Pure CPU-bound graph construction — no I/O, so
//! it lives in the domain crate next to the data it builds.

use crate::config::{parse_input_link, PipelineDescriptorDto};
use crate::error::PipelineError;
use crate::module::ModuleInstance;
use crate::registry::ModuleRegistry;
use crate::structure::{LinkSource, LinkTarget, ModuleInputLink, ModuleOutputLink, Structure, WorkflowInputLink, WorkflowOutputLink};
use crate::value_objects::{Address, Alias, StageNumber, WorkflowId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// When true, every child output without an explicit `output_aliases`
    /// entry is exposed as a workflow output named `"{alias}__{port}"`.
    pub expose_all_outputs_by_default: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            expose_all_outputs_by_default: false,
        }
    }
}

pub struct CompiledPipeline {
    pub structure: Structure,
    pub modules: HashMap<Alias, Arc<ModuleInstance>>,
}

/// Compiles a pipeline descriptor's children into a `Structure` plus the
/// instantiated `ModuleInstance`s, per §4.5.
pub fn compile(
    parent_address: &Address,
    descriptor: &PipelineDescriptorDto,
    registry: &dyn ModuleRegistry,
    options: CompileOptions,
) -> Result<CompiledPipeline, PipelineError> {
    // --- Step 1: instantiate children, assigning aliases. ---
    let mut modules: HashMap<Alias, Arc<ModuleInstance>> = HashMap::new();
    let mut children: Vec<Alias> = Vec::new();
    let mut used_aliases: HashSet<String> = HashSet::new();

    for child in &descriptor.modules {
        let alias = assign_alias(child, &mut used_aliases)?;
        let factory = registry.resolve(&child.module_type)?;
        let module = factory.create(&child.module_config)?;
        let address = parent_address.child(&alias);
        let instance = ModuleInstance::new(alias.clone(), address, child.module_type.clone(), module, StageNumber::FIRST);
        modules.insert(alias.clone(), Arc::new(instance));
        children.push(alias);
    }

    // --- Step 2: allocate output links. ---
    let mut module_output_links: HashMap<(Alias, String), ModuleOutputLink> = HashMap::new();
    let mut workflow_output_links: HashMap<String, WorkflowOutputLink> = HashMap::new();

    for alias in &children {
        let instance = &modules[alias];
        for (port, schema) in instance.module.output_schema() {
            let mut link = ModuleOutputLink {
                module_alias: alias.clone(),
                port_name: port.clone(),
                schema: schema.clone(),
                targets: Vec::new(),
            };

            // Explicit override wins (§9 open question resolution): an
            // `output_aliases` entry always takes priority over the
            // default-exposure behavior below.
            if let Some(external_name) = descriptor.resolve_output_alias(alias.as_str(), port) {
                if let Some(existing) = workflow_output_links.get(&external_name) {
                    if existing.schema.value_type() != schema.value_type() {
                        return Err(PipelineError::type_mismatch(
                            external_name,
                            existing.schema.value_type().to_string(),
                            schema.value_type().to_string(),
                        ));
                    }
                } else {
                    workflow_output_links.insert(
                        external_name.clone(),
                        WorkflowOutputLink {
                            name: external_name.clone(),
                            schema: schema.clone(),
                        },
                    );
                }
                link.targets.push(LinkTarget::WorkflowOutput(external_name));
            } else if options.expose_all_outputs_by_default {
                let external_name = format!("{}__{}", alias.as_str(), port);
                workflow_output_links.insert(
                    external_name.clone(),
                    WorkflowOutputLink {
                        name: external_name.clone(),
                        schema: schema.clone(),
                    },
                );
                link.targets.push(LinkTarget::WorkflowOutput(external_name));
            }

            module_output_links.insert((alias.clone(), port.clone()), link);
        }
    }

    // --- Step 3: resolve input links. ---
    let mut module_input_links: HashMap<(Alias, String), ModuleInputLink> = HashMap::new();
    let mut workflow_input_links: HashMap<String, WorkflowInputLink> = HashMap::new();
    let mut execution_edges: Vec<(Alias, Alias)> = Vec::new();

    for (alias, child_desc) in children.iter().zip(descriptor.modules.iter()) {
        let input_schema = modules[alias].module.input_schema().clone();
        for (port, schema) in input_schema.iter() {
            if let Some(spec) = child_desc.input_links.get(port) {
                let normalized = parse_input_link(port, spec)?;
                let src_alias = Alias::new(normalized.module_id.clone());
                let key = (src_alias.clone(), normalized.value_name.clone());
                let src_link = module_output_links.get(&key).ok_or_else(|| {
                    PipelineError::bad_input_link(
                        port,
                        format!("no such output '{}.{}'", normalized.module_id, normalized.value_name),
                    )
                })?;
                if src_link.schema.value_type() != schema.value_type() {
                    return Err(PipelineError::type_mismatch(
                        format!("{alias}.{port}"),
                        schema.value_type().to_string(),
                        src_link.schema.value_type().to_string(),
                    ));
                }

                module_input_links.insert(
                    (alias.clone(), port.clone()),
                    ModuleInputLink {
                        module_alias: alias.clone(),
                        port_name: port.clone(),
                        schema: schema.clone(),
                        source: LinkSource::ModuleOutput(src_alias.clone(), normalized.value_name.clone()),
                    },
                );
                module_output_links
                    .get_mut(&key)
                    .expect("looked up above")
                    .targets
                    .push(LinkTarget::ModuleInput(alias.clone(), port.clone()));
                execution_edges.push((src_alias, alias.clone()));
            } else {
                let external_name = descriptor.resolve_input_alias(alias.as_str(), port);
                if let Some(existing) = workflow_input_links.get(&external_name) {
                    if existing.schema.value_type() != schema.value_type() {
                        return Err(PipelineError::type_mismatch(
                            external_name,
                            existing.schema.value_type().to_string(),
                            schema.value_type().to_string(),
                        ));
                    }
                } else {
                    workflow_input_links.insert(
                        external_name.clone(),
                        WorkflowInputLink {
                            name: external_name.clone(),
                            schema: schema.clone(),
                        },
                    );
                }

                module_input_links.insert(
                    (alias.clone(), port.clone()),
                    ModuleInputLink {
                        module_alias: alias.clone(),
                        port_name: port.clone(),
                        schema: schema.clone(),
                        source: LinkSource::WorkflowInput(external_name),
                    },
                );
            }
        }
    }

    // --- Steps 4-6: synthetic root, stage assignment, cycle detection. ---
    let mut depends_on: HashMap<Alias, Vec<Alias>> = HashMap::new();
    for (src, dst) in &execution_edges {
        depends_on.entry(dst.clone()).or_default().push(src.clone());
    }

    let mut memo: HashMap<Alias, u32> = HashMap::new();
    for alias in &children {
        let mut visiting = HashSet::new();
        let mut path = Vec::new();
        compute_stage(alias, &depends_on, &mut memo, &mut visiting, &mut path)?;
    }

    let max_stage = memo.values().copied().max().unwrap_or(0);
    let mut stages: Vec<Vec<Alias>> = vec![Vec::new(); max_stage as usize];
    for alias in &children {
        let stage_num = memo[alias];
        stages[(stage_num - 1) as usize].push(alias.clone());
    }
    for (alias, instance) in modules.iter() {
        instance.set_execution_stage(StageNumber::new(memo[alias]));
    }

    let structure = Structure {
        workflow_id: WorkflowId::new(),
        children,
        execution_edges,
        stages,
        workflow_input_links,
        workflow_output_links,
        module_input_links,
        module_output_links,
    };

    Ok(CompiledPipeline { structure, modules })
}

fn assign_alias(desc: &crate::config::ModuleDescriptorDto, used: &mut HashSet<String>) -> Result<Alias, PipelineError> {
    if let Some(explicit) = &desc.module_alias {
        if !used.insert(explicit.clone()) {
            return Err(PipelineError::DuplicateAlias(explicit.clone()));
        }
        return Ok(Alias::new(explicit.clone()));
    }

    let base = &desc.module_type;
    if used.insert(base.clone()) {
        return Ok(Alias::new(base.clone()));
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if used.insert(candidate.clone()) {
            return Ok(Alias::new(candidate));
        }
        n += 1;
    }
}

/// Longest-path stage number via memoized DFS; a node found on the current
/// recursion stack means a cycle through the execution graph.
fn compute_stage(
    alias: &Alias,
    depends_on: &HashMap<Alias, Vec<Alias>>,
    memo: &mut HashMap<Alias, u32>,
    visiting: &mut HashSet<Alias>,
    path: &mut Vec<Alias>,
) -> Result<u32, PipelineError> {
    if let Some(&s) = memo.get(alias) {
        return Ok(s);
    }
    if visiting.contains(alias) {
        path.push(alias.clone());
        let chain = path.iter().map(Alias::to_string).collect::<Vec<_>>().join(" -> ");
        return Err(PipelineError::CyclicDependency(chain));
    }

    visiting.insert(alias.clone());
    path.push(alias.clone());

    let stage = match depends_on.get(alias) {
        None => 1,
        Some(deps) if deps.is_empty() => 1,
        Some(deps) => {
            let mut max_dep = 0;
            for dep in deps {
                max_dep = max_dep.max(compute_stage(dep, depends_on, memo, visiting, path)?);
            }
            max_dep + 1
        }
    };

    path.pop();
    visiting.remove(alias);
    memo.insert(alias.clone(), stage);
    Ok(stage)
}
