// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Leaving a workflow input unset must not error the run: the affected
//! module (and anything downstream of it) simply stays STALE.

use dataflow_domain::config::{ModuleDescriptorDto, PipelineDescriptorDto};
use dataflow_domain::value_objects::Value;
use dataflow_domain::state::ModuleState;
use dataflow_domain::Pipeline;
use dataflow_engine::{CooperativeExecutor, Registry};
use std::collections::HashMap;
use std::sync::Arc;

fn and_gate_descriptor() -> PipelineDescriptorDto {
    let mut output_aliases = HashMap::new();
    output_aliases.insert("gate__y".to_string(), "result".to_string());

    PipelineDescriptorDto {
        modules: vec![ModuleDescriptorDto {
            module_type: "and".to_string(),
            module_alias: Some("gate".to_string()),
            module_config: serde_json::Map::new(),
            input_links: HashMap::new(),
        }],
        input_aliases: HashMap::new(),
        output_aliases,
        module_type_name: None,
        doc: None,
    }
}

#[tokio::test]
async fn unset_input_leaves_pipeline_stale_without_erroring() {
    let registry = Registry::with_builtin_modules();
    registry.register_pipeline("gate", and_gate_descriptor()).unwrap();
    let pipeline = Pipeline::create_workflow("gate", None, Arc::new(registry)).unwrap();

    // Only "a" is set; "b" is left unbound, so the gate never reaches
    // INPUTS_READY and the scheduler skips it without dispatching.
    pipeline.inputs().get("gate__a").unwrap().set(Value::Boolean(true)).unwrap();

    pipeline.process(&CooperativeExecutor, None).await.unwrap();

    assert_eq!(pipeline.state(), ModuleState::Stale);
    assert_eq!(pipeline.outputs().get("result").unwrap().get(), None);
}

#[tokio::test]
async fn supplying_every_input_reaches_results_ready() {
    let registry = Registry::with_builtin_modules();
    registry.register_pipeline("gate", and_gate_descriptor()).unwrap();
    let pipeline = Pipeline::create_workflow("gate", None, Arc::new(registry)).unwrap();

    pipeline.inputs().get("gate__a").unwrap().set(Value::Boolean(true)).unwrap();
    pipeline.inputs().get("gate__b").unwrap().set(Value::Boolean(true)).unwrap();
    pipeline.process(&CooperativeExecutor, None).await.unwrap();

    assert_eq!(pipeline.state(), ModuleState::ResultsReady);
    assert_eq!(pipeline.outputs().get("result").unwrap().get(), Some(Value::Boolean(true)));
}
