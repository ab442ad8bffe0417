// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Error (§7)
//!
//! `dataflow-domain`'s `PipelineError` stays format-agnostic; this wraps the
//! I/O and serde errors the descriptor loader (C10) and config layer (C12)
//! actually produce, with `From` conversions in the teacher's
//! domain/infrastructure error split.

use dataflow_domain::PipelineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML descriptor '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON descriptor '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("descriptor '{path}' has unrecognized extension '{ext}'")]
    UnrecognizedExtension { path: PathBuf, ext: String },
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io { path: path.into(), source }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        EngineError::Yaml { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EngineError::Json { path: path.into(), source }
    }

    /// Maps down to the domain error taxonomy for exit-code purposes;
    /// non-pipeline failures (I/O, parse, config) are all configuration
    /// failures per §6 — the descriptor itself couldn't be read.
    pub fn as_pipeline_error(&self) -> PipelineError {
        match self {
            EngineError::Pipeline(e) => e.clone(),
            EngineError::Io { path, source } => PipelineError::InvalidConfiguration(format!("{}: {source}", path.display())),
            EngineError::Yaml { path, source } => PipelineError::InvalidConfiguration(format!("{}: {source}", path.display())),
            EngineError::Json { path, source } => PipelineError::InvalidConfiguration(format!("{}: {source}", path.display())),
            EngineError::Config(e) => PipelineError::InvalidConfiguration(e.to_string()),
            EngineError::UnrecognizedExtension { path, ext } => {
                PipelineError::InvalidConfiguration(format!("{}: unrecognized extension '{ext}'", path.display()))
            }
        }
    }
}
