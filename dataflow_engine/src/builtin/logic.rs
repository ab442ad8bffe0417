// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Boolean gate built-ins: `and`, `or`, `not` — seed scenario 1's XOR is
//! assembled from these.

use async_trait::async_trait;
use dataflow_domain::data::{InputBag, OutputBag};
use dataflow_domain::module::{Module, ModuleFactory};
use dataflow_domain::value_objects::{Schema, Value, ValueType};
use dataflow_domain::PipelineError;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

fn boolean_schema_map(names: &[&str]) -> HashMap<String, Schema> {
    names.iter().map(|n| (n.to_string(), Schema::new(ValueType::Boolean))).collect()
}

fn read_bool(inputs: &InputBag, port: &str) -> Result<bool, PipelineError> {
    inputs
        .get(port)
        .and_then(|item| item.get())
        .and_then(|v| v.as_boolean())
        .ok_or_else(|| PipelineError::InvariantViolation(format!("input '{port}' missing or not boolean at process time")))
}

macro_rules! binary_gate {
    ($module:ident, $factory:ident, $op:expr) => {
        pub struct $module;

        #[async_trait]
        impl Module for $module {
            fn input_schema(&self) -> &HashMap<String, Schema> {
                static SCHEMA: OnceLock<HashMap<String, Schema>> = OnceLock::new();
                SCHEMA.get_or_init(|| boolean_schema_map(&["a", "b"]))
            }
            fn output_schema(&self) -> &HashMap<String, Schema> {
                static SCHEMA: OnceLock<HashMap<String, Schema>> = OnceLock::new();
                SCHEMA.get_or_init(|| boolean_schema_map(&["y"]))
            }
            async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
                let a = read_bool(inputs, "a")?;
                let b = read_bool(inputs, "b")?;
                let op: fn(bool, bool) -> bool = $op;
                let mut values = HashMap::new();
                values.insert("y".to_string(), Value::Boolean(op(a, b)));
                outputs.set_values(values)
            }
        }

        pub struct $factory;
        impl ModuleFactory for $factory {
            fn create(&self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
                Ok(Arc::new($module))
            }
        }
    };
}

binary_gate!(And, AndFactory, |a, b| a && b);
binary_gate!(Or, OrFactory, |a, b| a || b);

pub struct Not;

#[async_trait]
impl Module for Not {
    fn input_schema(&self) -> &HashMap<String, Schema> {
        static SCHEMA: OnceLock<HashMap<String, Schema>> = OnceLock::new();
        SCHEMA.get_or_init(|| boolean_schema_map(&["a"]))
    }
    fn output_schema(&self) -> &HashMap<String, Schema> {
        static SCHEMA: OnceLock<HashMap<String, Schema>> = OnceLock::new();
        SCHEMA.get_or_init(|| boolean_schema_map(&["y"]))
    }
    async fn process(&self, inputs: &InputBag, outputs: &OutputBag) -> Result<(), PipelineError> {
        let a = read_bool(inputs, "a")?;
        let mut values = HashMap::new();
        values.insert("y".to_string(), Value::Boolean(!a));
        outputs.set_values(values)
    }
}

pub struct NotFactory;
impl ModuleFactory for NotFactory {
    fn create(&self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<Arc<dyn Module>, PipelineError> {
        Ok(Arc::new(Not))
    }
}
