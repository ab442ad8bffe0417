// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # dataflow-engine
//!
//! The runtime layer above `dataflow-domain`: concrete executors (C8), the
//! module registry and descriptor loader (C10), the built-in module
//! library (C11), and engine configuration (C12). Everything here needs a
//! runtime or the filesystem; the pure graph/control-flow logic stays in
//! the domain crate.

pub mod builtin;
pub mod config;
pub mod error;
pub mod execution;
pub mod registry;

pub use config::{EngineConfig, ExecutorKind};
pub use error::EngineError;
pub use execution::{CooperativeExecutor, WorkerPoolExecutor};
pub use registry::Registry;

use dataflow_domain::executor::Executor;
use std::sync::Arc;

/// Builds the configured concrete `Executor` for a `Pipeline::process` run.
pub fn executor_for(config: &EngineConfig) -> Arc<dyn Executor> {
    match config.executor_kind {
        ExecutorKind::Cooperative => Arc::new(CooperativeExecutor),
        ExecutorKind::WorkerPool => Arc::new(WorkerPoolExecutor::new(config.worker_pool_size)),
    }
}

/// Builds a `Registry` pre-populated with built-ins and every pipeline
/// descriptor found under `config.registry_scan_roots`.
pub fn build_registry(config: &EngineConfig) -> Result<Registry, EngineError> {
    let registry = Registry::with_builtin_modules();
    for root in &config.registry_scan_roots {
        registry.scan_and_register(root, &config.registry_scan_exclusions)?;
    }
    Ok(registry)
}
