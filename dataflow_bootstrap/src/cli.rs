// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling: a clap-derived `Cli`, parsed then
//! validated into a `ValidatedCli` (§4.13/§6).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parse_cli()                     │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Path + input expression validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Ready for the engine
//! └─────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// The dataflow pipeline engine CLI.
#[derive(Debug, Parser)]
#[command(name = "dataflow-engine", version, about = "Compile, run, and inspect dataflow pipeline descriptors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directories to scan for module/pipeline descriptors (C10). Repeatable.
    #[arg(long = "scan-root", global = true)]
    pub scan_roots: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile a pipeline descriptor and report its stage assignment, or fail on cycles.
    Compile {
        /// Path to the pipeline descriptor file (YAML or JSON).
        descriptor_path: PathBuf,
    },
    /// Run a pipeline descriptor to completion.
    Run {
        /// Path to the pipeline descriptor file (YAML or JSON).
        descriptor_path: PathBuf,

        /// Workflow input as `name=json_value`, e.g. `--input a=true --input count=3`. Repeatable.
        #[arg(long = "input")]
        inputs: Vec<String>,

        /// Abort the run if it does not finish within this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print structural details (stages, ports, state) for a pipeline descriptor.
    Inspect {
        /// Path to the pipeline descriptor file (YAML or JSON).
        descriptor_path: PathBuf,
    },
}

/// CLI arguments after parsing and validation.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub scan_roots: Vec<PathBuf>,
}

/// Validated command variants, with paths checked and input expressions parsed.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Compile {
        descriptor_path: PathBuf,
    },
    Run {
        descriptor_path: PathBuf,
        inputs: HashMap<String, serde_json::Value>,
        timeout: Option<Duration>,
    },
    Inspect {
        descriptor_path: PathBuf,
    },
}

#[derive(Debug, Error, Clone)]
pub enum ParseError {
    #[error("descriptor path does not exist: {0}")]
    DescriptorNotFound(PathBuf),

    #[error("descriptor path has unsupported extension (expected .yaml, .yml, or .json): {0}")]
    UnsupportedExtension(PathBuf),

    #[error("invalid --input expression '{0}': expected name=json_value")]
    BadInputExpression(String),

    #[error("invalid --input value for '{name}': {reason}")]
    BadInputValue { name: String, reason: String },
}

/// Parse CLI arguments with clap. Clap handles `--help`/`--version` and
/// exits the process on its own.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse and validate CLI arguments in one step.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_descriptor_path(path: &Path) -> Result<PathBuf, ParseError> {
    if !path.exists() {
        return Err(ParseError::DescriptorNotFound(path.to_path_buf()));
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") | Some("json") => Ok(path.to_path_buf()),
        _ => Err(ParseError::UnsupportedExtension(path.to_path_buf())),
    }
}

/// Parses `name=json_value`. The value is first tried as JSON (so `true`,
/// `3`, `"x"`, `{"a":1}` all work); a bare unquoted string falls back to a
/// JSON string literal so `--input name=bob` doesn't require quoting.
fn parse_input_expr(expr: &str) -> Result<(String, serde_json::Value), ParseError> {
    let (name, raw) = expr.split_once('=').ok_or_else(|| ParseError::BadInputExpression(expr.to_string()))?;
    if name.is_empty() {
        return Err(ParseError::BadInputExpression(expr.to_string()));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let command = match cli.command {
        Commands::Compile { descriptor_path } => ValidatedCommand::Compile {
            descriptor_path: validate_descriptor_path(&descriptor_path)?,
        },
        Commands::Inspect { descriptor_path } => ValidatedCommand::Inspect {
            descriptor_path: validate_descriptor_path(&descriptor_path)?,
        },
        Commands::Run {
            descriptor_path,
            inputs,
            timeout_secs,
        } => {
            let descriptor_path = validate_descriptor_path(&descriptor_path)?;
            let mut parsed = HashMap::new();
            for expr in &inputs {
                let (name, value) = parse_input_expr(expr)?;
                parsed.insert(name, value);
            }
            ValidatedCommand::Run {
                descriptor_path,
                inputs: parsed,
                timeout: timeout_secs.map(Duration::from_secs),
            }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        scan_roots: cli.scan_roots,
    })
}
