// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `passthrough` (§4.11): copies its single input `x` to its single output
//! `x` unchanged. `module_config.value_type` selects the port type, default
//! `boolean`.

use async_trait::async_trait;
use dataflow_domain::data::{InputBag, OutputBag};
use dataflow_domain::module::{Module, ModuleFactory};
use dataflow_domain::value_objects::{Schema, ValueType};
use dataflow_domain::PipelineError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Passthrough {
    input_schema: HashMap<String, Schema>,
    output_schema: HashMap<String, Schema>,
}

#[async_trait]
impl Module for Passthrough {
    fn input_schema(&self) -> &HashMap<String, Schema> {
        &self.input_schema
    }
    fn output_schema(&self) -> &HashMap<String, Schema> {
        &self.output_schema
    }
    async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
        let value = inputs
            .get("x")
            .and_then(|item| item.get())
            .ok_or_else(|| PipelineError::InvariantViolation("input 'x' missing at process time".to_string()))?;
        let mut values = HashMap::new();
        values.insert("x".to_string(), value);
        outputs.set_values(values)
    }
}

pub struct PassthroughFactory;

impl ModuleFactory for PassthroughFactory {
    fn create(&self, config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
        let value_type = match config.get("value_type").and_then(|v| v.as_str()) {
            Some(name) => ValueType::from_name(name).ok_or_else(|| PipelineError::UnknownValueType(name.to_string()))?,
            None => ValueType::Boolean,
        };
        let schema = Schema::new(value_type);
        let mut input_schema = HashMap::new();
        input_schema.insert("x".to_string(), schema.clone());
        let mut output_schema = HashMap::new();
        output_schema.insert("x".to_string(), schema);
        Ok(Arc::new(Passthrough { input_schema, output_schema }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_domain::value_objects::Value;

    #[tokio::test]
    async fn copies_input_to_output_unchanged() {
        let module = PassthroughFactory.create(&serde_json::Map::new()).unwrap();
        let inputs = InputBag::from_schemas(module.input_schema().iter().map(|(k, v)| (k.clone(), v.clone())));
        let outputs = OutputBag::from_schemas(module.output_schema().iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut values = HashMap::new();
        values.insert("x".to_string(), Value::Boolean(true));
        inputs.set_values(values).unwrap();
        module.process(&inputs, &outputs).await.unwrap();
        assert_eq!(outputs.get("x").unwrap().get(), Some(Value::Boolean(true)));
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        let mut config = serde_json::Map::new();
        config.insert("value_type".to_string(), serde_json::json!("frobnicator"));
        assert!(matches!(PassthroughFactory.create(&config), Err(PipelineError::UnknownValueType(_))));
    }
}
