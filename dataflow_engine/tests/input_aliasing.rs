// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A single workflow input aliased to more than one child port must drive
//! every bound child from one write (§4.5 step 3 / §4.6 priming).

use dataflow_domain::config::{ModuleDescriptorDto, PipelineDescriptorDto};
use dataflow_domain::value_objects::Value;
use dataflow_domain::Pipeline;
use dataflow_engine::{CooperativeExecutor, Registry};
use std::collections::HashMap;
use std::sync::Arc;

fn shared_input_descriptor() -> PipelineDescriptorDto {
    let mut input_aliases = HashMap::new();
    input_aliases.insert("not_1__a".to_string(), "shared".to_string());
    input_aliases.insert("not_2__a".to_string(), "shared".to_string());

    let mut output_aliases = HashMap::new();
    output_aliases.insert("not_1__y".to_string(), "out_1".to_string());
    output_aliases.insert("not_2__y".to_string(), "out_2".to_string());

    PipelineDescriptorDto {
        modules: vec![
            ModuleDescriptorDto {
                module_type: "not".to_string(),
                module_alias: Some("not_1".to_string()),
                module_config: serde_json::Map::new(),
                input_links: HashMap::new(),
            },
            ModuleDescriptorDto {
                module_type: "not".to_string(),
                module_alias: Some("not_2".to_string()),
                module_config: serde_json::Map::new(),
                input_links: HashMap::new(),
            },
        ],
        input_aliases,
        output_aliases,
        module_type_name: None,
        doc: None,
    }
}

#[tokio::test]
async fn one_workflow_input_drives_every_aliased_child() {
    let registry = Registry::with_builtin_modules();
    registry.register_pipeline("fanout", shared_input_descriptor()).unwrap();
    let pipeline = Pipeline::create_workflow("fanout", None, Arc::new(registry)).unwrap();

    assert_eq!(pipeline.inputs().names().to_vec(), vec!["shared".to_string()]);

    pipeline.inputs().get("shared").unwrap().set(Value::Boolean(true)).unwrap();
    pipeline.process(&CooperativeExecutor, None).await.unwrap();

    assert_eq!(pipeline.outputs().get("out_1").unwrap().get(), Some(Value::Boolean(false)));
    assert_eq!(pipeline.outputs().get("out_2").unwrap().get(), Some(Value::Boolean(false)));
}
