// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `delay` (§4.11): sleeps for `module_config.delay_ms` then copies its
//! input `x` to its output `x` unchanged. Used by the staged-parallelism
//! (§8 scenario 2) and cancellation (§8 scenario 5) seed scenarios: a delay
//! always completes the sleep it started — cancellation is observed
//! between stages, not mid-`process`.

use async_trait::async_trait;
use dataflow_domain::data::{InputBag, OutputBag};
use dataflow_domain::module::{Module, ModuleFactory};
use dataflow_domain::value_objects::{Schema, ValueType};
use dataflow_domain::PipelineError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub struct Delay {
    delay: Duration,
    input_schema: HashMap<String, Schema>,
    output_schema: HashMap<String, Schema>,
}

#[async_trait]
impl Module for Delay {
    fn input_schema(&self) -> &HashMap<String, Schema> {
        &self.input_schema
    }
    fn output_schema(&self) -> &HashMap<String, Schema> {
        &self.output_schema
    }
    async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
        tokio::time::sleep(self.delay).await;
        let value = inputs
            .get("x")
            .and_then(|item| item.get())
            .ok_or_else(|| PipelineError::InvariantViolation("input 'x' missing at process time".to_string()))?;
        let mut values = HashMap::new();
        values.insert("x".to_string(), value);
        outputs.set_values(values)
    }
}

pub struct DelayFactory;

impl ModuleFactory for DelayFactory {
    fn create(&self, config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
        let delay_ms = config
            .get("delay_ms")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| PipelineError::InvalidConfigField {
                field: "delay_ms".to_string(),
                reason: "required, must be a non-negative integer".to_string(),
            })?;
        let value_type = match config.get("value_type").and_then(|v| v.as_str()) {
            Some(name) => ValueType::from_name(name).ok_or_else(|| PipelineError::UnknownValueType(name.to_string()))?,
            None => ValueType::Boolean,
        };
        let schema = Schema::new(value_type);
        let mut input_schema = HashMap::new();
        input_schema.insert("x".to_string(), schema.clone());
        let mut output_schema = HashMap::new();
        output_schema.insert("x".to_string(), schema);
        Ok(Arc::new(Delay {
            delay: Duration::from_millis(delay_ms),
            input_schema,
            output_schema,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_domain::value_objects::Value;
    use std::time::Instant;

    #[tokio::test]
    async fn sleeps_for_configured_duration_then_copies_value() {
        let mut config = serde_json::Map::new();
        config.insert("delay_ms".to_string(), serde_json::json!(20));
        let module = DelayFactory.create(&config).unwrap();

        let inputs = InputBag::from_schemas(module.input_schema().iter().map(|(k, v)| (k.clone(), v.clone())));
        let outputs = OutputBag::from_schemas(module.output_schema().iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut values = HashMap::new();
        values.insert("x".to_string(), Value::Boolean(true));
        inputs.set_values(values).unwrap();

        let started = Instant::now();
        module.process(&inputs, &outputs).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(outputs.get("x").unwrap().get(), Some(Value::Boolean(true)));
    }

    #[test]
    fn missing_delay_ms_is_rejected() {
        let config = serde_json::Map::new();
        assert!(matches!(
            DelayFactory.create(&config),
            Err(PipelineError::InvalidConfigField { .. })
        ));
    }
}
