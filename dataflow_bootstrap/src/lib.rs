// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the domain and engine layers and
//! provides:
//!
//! - **Entry point** - CLI parsing and validation for `compile`/`run`/`inspect`
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT)
//! - **Exit code mapping** - §6 exit code table, driven by `PipelineError::category`
//! - **Shutdown coordination** - Cancellation token propagation with grace period
//!
//! ## Architecture Position
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          BOOTSTRAP (This Module)            │
//! │  - Entry Point / CLI                        │
//! │  - Signal Handling                          │
//! │  - Exit Code Mapping                        │
//! │  - Shutdown Coordination                    │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │           ENGINE LAYER                      │
//! │  - Concrete Executors                       │
//! │  - Registry / Descriptor Loader             │
//! │  - Built-in Modules                         │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │           DOMAIN LAYER                      │
//! │  - Compiler, Assembly, Scheduler             │
//! │  - Value Objects, Errors                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - `cli` - Argument parsing and validation
//! - `exit_code` - §6 exit code mapping
//! - `logger` - Bootstrap-specific logging
//! - `shutdown` - Shutdown coordination
//! - `signals` - Signal handling (SIGINT, SIGTERM)

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ValidatedCli, ValidatedCommand};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};

/// Bootstrap and parse CLI arguments.
///
/// 1. CLI parsing with clap
/// 2. Validation (path existence, input expression parsing)
/// 3. Returns validated configuration
///
/// The caller is responsible for running the engine and mapping the result
/// to an exit code using `result_to_exit_code`.
///
/// Clap handles `--help`/`--version` automatically and exits the process.
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
