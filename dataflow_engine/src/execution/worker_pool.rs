// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Worker-Pool Executor (C8)
//!
//! Dispatches a stage's modules onto a bounded `rayon` thread pool, each
//! worker driving one module's `process` to completion synchronously —
//! matching the teacher's CPU-bound `ChunkProcessor` pattern of handing
//! fixed-size units of work to a `rayon::ThreadPool` rather than spawning
//! unbounded tasks.

use async_trait::async_trait;
use dataflow_domain::{ModuleInstance, PipelineError};
use rayon::ThreadPool;
use std::sync::Arc;

pub struct WorkerPoolExecutor {
    pool: Arc<ThreadPool>,
}

impl WorkerPoolExecutor {
    pub fn new(worker_count: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count.max(1))
            .build()
            .expect("rayon thread pool construction cannot fail with a valid thread count");
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl dataflow_domain::executor::Executor for WorkerPoolExecutor {
    #[tracing::instrument(skip_all, fields(batch_size = modules.len()))]
    async fn run_all(&self, modules: Vec<Arc<ModuleInstance>>) -> Result<(), PipelineError> {
        let pool = Arc::clone(&self.pool);
        let results: Vec<(String, Result<(), PipelineError>)> = tokio::task::spawn_blocking(move || {
            pool.install(|| {
                use rayon::prelude::*;
                modules
                    .into_par_iter()
                    .map(|instance| {
                        let alias = instance.alias.to_string();
                        let result = block_on_module_run(&instance);
                        (alias, result)
                    })
                    .collect()
            })
        })
        .await
        .expect("worker-pool dispatch task panicked");

        let mut failures = Vec::new();
        for (alias, result) in results {
            if let Err(e) = result {
                failures.push(format!("{alias}: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::StageFailed(failures.join(", ")))
        }
    }
}

/// Each rayon worker drives its module's async `process` to completion on a
/// throwaway single-threaded runtime, so the worker pool's thread count (not
/// an async executor's task scheduler) bounds concurrency.
fn block_on_module_run(instance: &ModuleInstance) -> Result<(), PipelineError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("current-thread runtime construction cannot fail");
    runtime.block_on(instance.run())
}
