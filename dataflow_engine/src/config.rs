// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Configuration (C12, §4.12)
//!
//! Builder-style (`Default` + chained `with_*`), following the teacher's
//! `PipelineConfiguration` pattern. Loadable from a TOML file via the
//! `config` crate, layered over these defaults.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    Cooperative,
    WorkerPool,
}

impl Default for ExecutorKind {
    fn default() -> Self {
        ExecutorKind::Cooperative
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub executor_kind: ExecutorKind,
    pub worker_pool_size: usize,
    #[serde(deserialize_with = "duration_secs_opt::deserialize")]
    pub run_timeout: Option<Duration>,
    pub registry_scan_roots: Vec<PathBuf>,
    pub registry_scan_exclusions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executor_kind: ExecutorKind::default(),
            worker_pool_size: num_cpus(),
            run_timeout: None,
            registry_scan_roots: Vec::new(),
            registry_scan_exclusions: vec![".git".to_string(), ".tox".to_string(), ".cache".to_string()],
        }
    }
}

impl EngineConfig {
    pub fn with_executor_kind(mut self, kind: ExecutorKind) -> Self {
        self.executor_kind = kind;
        self
    }

    pub fn with_worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = size;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn with_registry_scan_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.registry_scan_roots = roots;
        self
    }

    pub fn with_registry_scan_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.registry_scan_exclusions = exclusions;
        self
    }

    /// Layers a TOML config file's `[engine]` table over these defaults.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, crate::error::EngineError> {
        let defaults = EngineConfig::default();
        let settings = config::Config::builder()
            .set_default("executor_kind", "cooperative")?
            .set_default("worker_pool_size", defaults.worker_pool_size as i64)?
            .set_default("registry_scan_exclusions", defaults.registry_scan_exclusions.clone())?
            .add_source(config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

mod duration_secs_opt {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
