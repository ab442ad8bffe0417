// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Registry (C3, port)
//!
//! The abstract contract the compiler resolves types against. Discovery and
//! population (scanning a directory tree, parsing descriptor files) are
//! infrastructure concerns — see `dataflow-engine`'s concrete registry and
//! descriptor loader (C10). This crate depends only on the trait.

use crate::config::PipelineDescriptorDto;
use crate::error::PipelineError;
use crate::module::ModuleFactory;
use std::sync::Arc;

/// Resolves a `module_type` name to either an atomic module factory or a
/// pipeline factory manufacturing a `PipelineModule` from a registered
/// descriptor (§4.3).
pub trait ModuleRegistry: Send + Sync {
    fn resolve(&self, type_name: &str) -> Result<Arc<dyn ModuleFactory>, PipelineError>;

    /// Registers (or replaces) a pipeline descriptor under `name`,
    /// re-validating it against the registry's currently known types.
    fn register_pipeline(&self, name: &str, descriptor: PipelineDescriptorDto) -> Result<(), PipelineError>;

    fn has_type(&self, type_name: &str) -> bool;

    /// Looks up the `PipelineDescriptorDto` registered under `type_name`,
    /// for top-level workflow creation (§6 `create_workflow`). Atomic-only
    /// registries may leave this at the default, which always fails.
    fn resolve_pipeline(&self, type_name: &str) -> Result<PipelineDescriptorDto, PipelineError> {
        Err(PipelineError::UnknownType(type_name.to_string()))
    }
}
