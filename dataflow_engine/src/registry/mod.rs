// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Concrete Registry (C10)
//!
//! Implements `dataflow_domain::registry::ModuleRegistry` against two maps:
//! atomic type factories (built-ins plus whatever a caller registers) and
//! pipeline descriptors discovered by the `DescriptorLoader`. Resolving a
//! pipeline type name hands back a `PipelineModuleFactory` (not a concrete
//! value) so every instantiation gets a freshly compiled, freshly wired
//! structure, matching the teacher's repository-port-over-direct-query
//! style (`PipelineRepository::find_by_id` returning a fresh aggregate
//! each call).

pub mod loader;
pub mod pipeline_module;

use crate::execution::CooperativeExecutor;
use dataflow_domain::config::PipelineDescriptorDto;
use dataflow_domain::executor::Executor;
use dataflow_domain::module::ModuleFactory;
use dataflow_domain::registry::ModuleRegistry;
use dataflow_domain::PipelineError;
use pipeline_module::PipelineModuleFactory;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Cheaply cloneable: internal maps are `Arc<RwLock<..>>`, so every clone
/// shares the same registered state — needed so a `PipelineModuleFactory`
/// can hold its own `Arc<dyn ModuleRegistry>` handle back to the registry
/// that resolved it, for nested-pipeline recursion.
#[derive(Clone)]
pub struct Registry {
    types: Arc<RwLock<HashMap<String, Arc<dyn ModuleFactory>>>>,
    pipelines: Arc<RwLock<HashMap<String, PipelineDescriptorDto>>>,
    nested_executor: Arc<dyn Executor>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            types: Arc::new(RwLock::new(HashMap::new())),
            pipelines: Arc::new(RwLock::new(HashMap::new())),
            nested_executor: Arc::new(CooperativeExecutor),
        }
    }

    /// A registry pre-populated with the C11 built-in module types.
    pub fn with_builtin_modules() -> Self {
        let registry = Self::new();
        for (name, factory) in crate::builtin::factories() {
            registry.register_type(name, factory);
        }
        registry
    }

    pub fn register_type(&self, type_name: impl Into<String>, factory: Arc<dyn ModuleFactory>) {
        self.types.write().expect("registry type map lock poisoned").insert(type_name.into(), factory);
    }

    /// Scans `root` with the `DescriptorLoader` (C10, respecting
    /// `exclusions`) and registers every pipeline descriptor found.
    pub fn scan_and_register(&self, root: &Path, exclusions: &[String]) -> Result<usize, crate::error::EngineError> {
        let found = loader::DescriptorLoader::new(exclusions.to_vec()).scan(root)?;
        let count = found.len();
        for (name, descriptor) in found {
            self.register_pipeline(&name, descriptor)?;
        }
        Ok(count)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry for Registry {
    fn resolve(&self, type_name: &str) -> Result<Arc<dyn ModuleFactory>, PipelineError> {
        if let Some(factory) = self.types.read().expect("registry type map lock poisoned").get(type_name) {
            return Ok(Arc::clone(factory));
        }
        if self.pipelines.read().expect("registry pipeline map lock poisoned").contains_key(type_name) {
            let descriptor = self.pipelines.read().expect("registry pipeline map lock poisoned")[type_name].clone();
            return Ok(Arc::new(PipelineModuleFactory {
                descriptor,
                registry: Arc::new(self.clone()),
                executor: Arc::clone(&self.nested_executor),
            }));
        }
        Err(PipelineError::UnknownType(type_name.to_string()))
    }

    fn register_pipeline(&self, name: &str, descriptor: PipelineDescriptorDto) -> Result<(), PipelineError> {
        for child in &descriptor.modules {
            if !self.has_type(&child.module_type) {
                return Err(PipelineError::UnknownType(child.module_type.clone()));
            }
        }
        self.pipelines
            .write()
            .expect("registry pipeline map lock poisoned")
            .insert(name.to_string(), descriptor);
        Ok(())
    }

    fn has_type(&self, type_name: &str) -> bool {
        self.types.read().expect("registry type map lock poisoned").contains_key(type_name)
            || self.pipelines.read().expect("registry pipeline map lock poisoned").contains_key(type_name)
    }

    fn resolve_pipeline(&self, type_name: &str) -> Result<PipelineDescriptorDto, PipelineError> {
        self.pipelines
            .read()
            .expect("registry pipeline map lock poisoned")
            .get(type_name)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownType(type_name.to_string()))
    }
}
