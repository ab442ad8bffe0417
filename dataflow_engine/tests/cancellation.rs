// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Cancellation is observed between stages, never mid-`process`: a stage
//! already dispatched always finishes.

use dataflow_domain::config::{InputLinkSpecDto, ModuleDescriptorDto, PipelineDescriptorDto};
use dataflow_domain::executor::CancellationToken;
use dataflow_domain::state::ModuleState;
use dataflow_domain::value_objects::{Alias, Value};
use dataflow_domain::{Pipeline, PipelineError};
use dataflow_engine::{CooperativeExecutor, Registry};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// `delay` (stage 1) feeding `not` (stage 2): cancelling partway through
/// the delay must still let it complete stage 1 before the cancellation
/// is observed ahead of stage 2.
fn delay_then_not_descriptor(delay_ms: u64) -> PipelineDescriptorDto {
    let mut config = serde_json::Map::new();
    config.insert("delay_ms".to_string(), serde_json::json!(delay_ms));
    config.insert("value_type".to_string(), serde_json::json!("boolean"));

    let mut not_links = HashMap::new();
    not_links.insert("a".to_string(), InputLinkSpecDto::Short("delay1.x".to_string()));

    PipelineDescriptorDto {
        modules: vec![
            ModuleDescriptorDto {
                module_type: "delay".to_string(),
                module_alias: Some("delay1".to_string()),
                module_config: config,
                input_links: HashMap::new(),
            },
            ModuleDescriptorDto {
                module_type: "not".to_string(),
                module_alias: Some("not1".to_string()),
                module_config: serde_json::Map::new(),
                input_links: not_links,
            },
        ],
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        module_type_name: None,
        doc: None,
    }
}

#[tokio::test]
async fn cancelling_mid_first_stage_still_completes_it_then_stops() {
    const DELAY_MS: u64 = 60;

    let registry = Registry::with_builtin_modules();
    registry.register_pipeline("two_stage", delay_then_not_descriptor(DELAY_MS)).unwrap();
    let pipeline = Pipeline::create_workflow("two_stage", None, Arc::new(registry)).unwrap();
    pipeline.inputs().get("delay1__x").unwrap().set(Value::Boolean(true)).unwrap();

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(DELAY_MS / 2)).await;
        cancel_clone.cancel();
    });

    let result = pipeline.process(&CooperativeExecutor, Some(&cancel)).await;
    assert!(matches!(result, Err(PipelineError::Cancelled)));

    // Stage 1 (delay1) ran to completion before cancellation was observed
    // ahead of stage 2. Its output value propagates to not1's input as
    // soon as it's written (wiring is independent of stage dispatch), so
    // not1 reaches INPUTS_READY without ever being dispatched itself.
    assert_eq!(pipeline.to_details(&Alias::new("delay1")).unwrap().state, ModuleState::ResultsReady.to_string());
    assert_eq!(pipeline.to_details(&Alias::new("not1")).unwrap().state, ModuleState::InputsReady.to_string());
}

#[tokio::test]
async fn already_cancelled_token_stops_before_any_stage_runs() {
    let registry = Registry::with_builtin_modules();
    registry.register_pipeline("two_stage", delay_then_not_descriptor(10)).unwrap();
    let pipeline = Pipeline::create_workflow("two_stage", None, Arc::new(registry)).unwrap();
    pipeline.inputs().get("delay1__x").unwrap().set(Value::Boolean(true)).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = pipeline.process(&CooperativeExecutor, Some(&cancel)).await;
    assert!(matches!(result, Err(PipelineError::Cancelled)));
    assert_eq!(pipeline.to_details(&Alias::new("delay1")).unwrap().state, ModuleState::InputsReady.to_string());
}
