// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Binary entry point: bootstraps the CLI (§4.13), builds the engine's
//! registry and executor (§4.12), and dispatches `compile`/`run`/`inspect`
//! against `dataflow-domain`'s `Pipeline` facade (§6).

use dataflow_bootstrap::cli::ValidatedCommand;
use dataflow_bootstrap::{bootstrap_cli, result_to_exit_code};
use dataflow_domain::executor::CancellationToken;
use dataflow_domain::value_objects::Value;
use dataflow_domain::{Pipeline, PipelineError};
use dataflow_engine::registry::loader::DescriptorLoader;
use dataflow_engine::{build_registry, executor_for, EngineConfig};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const SYNTHETIC_TYPE_NAME: &str = "__cli_descriptor__";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let validated = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("argument error: {e}");
            return ExitCode::from(2);
        }
    };

    let config = EngineConfig::default().with_registry_scan_roots(validated.scan_roots.clone());
    tracing::debug!(scan_roots = ?config.registry_scan_roots, executor_kind = ?config.executor_kind, "engine configured");
    let result = run_command(validated.command, config).await;
    result_to_exit_code(result)
}

#[tracing::instrument(skip(config))]
async fn run_command(command: ValidatedCommand, config: EngineConfig) -> Result<(), PipelineError> {
    match command {
        ValidatedCommand::Compile { descriptor_path } => {
            tracing::info!(descriptor = %descriptor_path.display(), "compiling descriptor");
            let pipeline = load_pipeline(&descriptor_path, &config)?;
            let details = pipeline.structure_details();
            println!("{}", serde_json::to_string_pretty(&details).expect("structure details always serialize"));
            Ok(())
        }
        ValidatedCommand::Inspect { descriptor_path } => {
            tracing::info!(descriptor = %descriptor_path.display(), "inspecting descriptor");
            let pipeline = load_pipeline(&descriptor_path, &config)?;
            let details = pipeline.structure_details();
            println!("{}", serde_json::to_string_pretty(&details).expect("structure details always serialize"));
            println!("overall state: {}", pipeline.state());
            Ok(())
        }
        ValidatedCommand::Run {
            descriptor_path,
            inputs,
            timeout,
        } => {
            tracing::info!(descriptor = %descriptor_path.display(), input_count = inputs.len(), "running pipeline");
            let pipeline = load_pipeline(&descriptor_path, &config)?;
            for (name, json_value) in inputs {
                let value = json_to_value(json_value)?;
                pipeline
                    .inputs()
                    .get(&name)
                    .ok_or_else(|| PipelineError::UnknownPort(name.clone()))?
                    .set(value)?;
            }

            let executor = executor_for(&config);
            let cancel = install_signal_cancellation();

            let run = pipeline.process(executor.as_ref(), Some(&cancel));
            match timeout.or(config.run_timeout) {
                Some(duration) => tokio::time::timeout(duration, run).await.map_err(|_| PipelineError::Timeout)??,
                None => run.await?,
            }

            let outputs: std::collections::HashMap<String, Option<Value>> = pipeline
                .outputs()
                .names()
                .iter()
                .map(|name| (name.clone(), pipeline.outputs().get(name).and_then(|item| item.get())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&outputs).expect("output values always serialize"));
            Ok(())
        }
    }
}

/// Loads a descriptor and drives it through the compiler (§4.5) and
/// wiring (§4.6), both internal to `Pipeline::create_workflow`.
#[tracing::instrument(skip(config))]
fn load_pipeline(descriptor_path: &std::path::Path, config: &EngineConfig) -> Result<Pipeline, PipelineError> {
    let registry = build_registry(config).map_err(|e| e.as_pipeline_error())?;
    let descriptor = DescriptorLoader::load_file(descriptor_path)
        .map_err(|e| e.as_pipeline_error())?
        .ok_or_else(|| PipelineError::InvalidConfiguration(format!("unrecognized descriptor extension: {}", descriptor_path.display())))?;
    registry.register_pipeline(SYNTHETIC_TYPE_NAME, descriptor)?;
    Pipeline::create_workflow(SYNTHETIC_TYPE_NAME, None, Arc::new(registry))
}

fn json_to_value(json: serde_json::Value) -> Result<Value, PipelineError> {
    match json {
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| PipelineError::ValidationError(format!("non-integer number: {n}"))),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Object(map) => {
            let mut dict = std::collections::BTreeMap::new();
            for (k, v) in map {
                dict.insert(k, json_to_value(v)?);
            }
            Ok(Value::Dict(dict))
        }
        serde_json::Value::Array(items) => {
            let mut table = Vec::new();
            for item in items {
                match json_to_value(item)? {
                    Value::Dict(d) => table.push(d),
                    other => return Err(PipelineError::ValidationError(format!("table rows must be objects, got {other:?}"))),
                }
            }
            Ok(Value::Table(table))
        }
        serde_json::Value::Null => Err(PipelineError::ValidationError("null is not a representable value".to_string())),
    }
}

/// Installs a SIGINT/SIGTERM handler and bridges it into the domain's
/// lightweight `CancellationToken`, since the scheduler (C8) is generic
/// over that type rather than the bootstrap layer's richer
/// `shutdown::CancellationToken`.
fn install_signal_cancellation() -> CancellationToken {
    let coordinator = Arc::new(dataflow_bootstrap::shutdown::ShutdownCoordinator::new(Duration::from_secs(5)));
    let bootstrap_token = coordinator.token();
    let domain_token = CancellationToken::new();

    dataflow_bootstrap::signals::install_handler(coordinator);

    let bridge_token = domain_token.clone();
    tokio::spawn(async move {
        bootstrap_token.cancelled().await;
        bridge_token.cancel();
    });

    domain_token
}
