// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cooperative Executor (C8)
//!
//! Runs an entire stage's modules as concurrent tokio tasks and awaits all
//! of them via `join_all`, matching the teacher's preference for
//! task-per-unit-of-work concurrency over a dedicated thread pool when the
//! work is already async (its own `FileIOService` chunk pipeline).

use async_trait::async_trait;
use dataflow_domain::{ModuleInstance, PipelineError};
use std::sync::Arc;

/// Spawns one tokio task per module in the batch; every task runs to
/// completion regardless of sibling failures.
pub struct CooperativeExecutor;

#[async_trait]
impl dataflow_domain::executor::Executor for CooperativeExecutor {
    #[tracing::instrument(skip_all, fields(batch_size = modules.len()))]
    async fn run_all(&self, modules: Vec<Arc<ModuleInstance>>) -> Result<(), PipelineError> {
        // Spawning first (rather than awaiting in the same loop) starts every
        // task before any of them are polled to completion, so a stage's
        // modules genuinely run concurrently.
        let handles: Vec<_> = modules
            .into_iter()
            .map(|instance| {
                tokio::spawn(async move {
                    let alias = instance.alias.to_string();
                    (alias, instance.run().await)
                })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((_alias, Ok(()))) => {}
                Ok((alias, Err(e))) => failures.push(format!("{alias}: {e}")),
                Err(join_err) => failures.push(format!("task panicked: {join_err}")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::StageFailed(failures.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_domain::data::{InputBag, OutputBag};
    use dataflow_domain::executor::Executor;
    use dataflow_domain::module::{Module, ModuleInstance};
    use dataflow_domain::value_objects::{Address, Alias, Schema, StageNumber, Value, ValueType};
    use std::collections::HashMap;

    struct AlwaysOk;
    #[async_trait]
    impl Module for AlwaysOk {
        fn input_schema(&self) -> &HashMap<String, Schema> {
            static S: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            S.get_or_init(HashMap::new)
        }
        fn output_schema(&self) -> &HashMap<String, Schema> {
            static S: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            S.get_or_init(|| {
                let mut m = HashMap::new();
                m.insert("y".to_string(), Schema::new(ValueType::Boolean));
                m
            })
        }
        async fn process(&self, _inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
            let mut values = HashMap::new();
            values.insert("y".to_string(), Value::Boolean(true));
            outputs.set_values(values)
        }
    }

    struct AlwaysFails;
    #[async_trait]
    impl Module for AlwaysFails {
        fn input_schema(&self) -> &HashMap<String, Schema> {
            static S: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            S.get_or_init(HashMap::new)
        }
        fn output_schema(&self) -> &HashMap<String, Schema> {
            static S: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();
            S.get_or_init(HashMap::new)
        }
        async fn process(&self, _inputs: &InputBag, _outputs: &OutputBag) -> Result<(), PipelineError> {
            Err(PipelineError::processing_error("failing", "boom"))
        }
    }

    fn instance(alias: &str, module: Arc<dyn Module>) -> Arc<ModuleInstance> {
        Arc::new(ModuleInstance::new(
            Alias::new(alias),
            Address::root().child(&Alias::new(alias)),
            "test".to_string(),
            module,
            StageNumber::FIRST,
        ))
    }

    #[tokio::test]
    async fn all_succeed_returns_ok() {
        let batch = vec![instance("a", Arc::new(AlwaysOk)), instance("b", Arc::new(AlwaysOk))];
        CooperativeExecutor.run_all(batch).await.unwrap();
    }

    #[tokio::test]
    async fn one_failure_reports_stage_failed_and_lets_siblings_finish() {
        let ok = instance("ok", Arc::new(AlwaysOk));
        let fails = instance("bad", Arc::new(AlwaysFails));
        let batch = vec![Arc::clone(&ok), Arc::clone(&fails)];

        let result = CooperativeExecutor.run_all(batch).await;
        assert!(matches!(result, Err(PipelineError::StageFailed(_))));
        if let Err(PipelineError::StageFailed(msg)) = result {
            assert!(msg.contains("bad"));
            assert!(!msg.contains("ok:"));
        }
        assert!(ok.output_bag.get("y").unwrap().is_valid());
    }
}
