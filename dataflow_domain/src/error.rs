// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Error
//!
//! The domain's single error type, covering configuration, structural, and
//! runtime failures of the compiler, wiring, and scheduler. The domain stays
//! format-agnostic: conversions from I/O or serde errors live on the engine
//! crate's `EngineError`, not here.

use std::fmt;
use thiserror::Error;

/// Broad classification used for operator-facing exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Structural,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Structural => "structural",
            ErrorCategory::Runtime => "runtime",
        };
        write!(f, "{s}")
    }
}

/// Errors raised by the compiler, wiring, state machine, and scheduler.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    // --- Configuration ---
    #[error("unknown module type '{0}'")]
    UnknownType(String),

    #[error("duplicate alias '{0}' within enclosing pipeline")]
    DuplicateAlias(String),

    #[error("bad input link for port '{port}': {reason}")]
    BadInputLink { port: String, reason: String },

    #[error("type mismatch on workflow input '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("unknown port '{0}'")]
    UnknownPort(String),

    #[error("invalid config field '{field}': {reason}")]
    InvalidConfigField { field: String, reason: String },

    #[error("unknown value type '{0}'")]
    UnknownValueType(String),

    #[error("default value incompatible with schema type {0}")]
    IncompatibleDefault(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    // --- Structural ---
    #[error("cyclic dependency detected: {0}")]
    CyclicDependency(String),

    #[error("missing binding for '{0}'")]
    MissingBinding(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    // --- Runtime ---
    #[error("input bag is locked (writable=false)")]
    InputLocked,

    #[error("module '{module}' failed: {cause}")]
    ProcessingError { module: String, cause: String },

    #[error("stage failed: {0} module(s) reported errors")]
    StageFailed(String),

    #[error("run was cancelled")]
    Cancelled,

    #[error("run timed out")]
    Timeout,

    #[error("validation error: {0}")]
    ValidationError(String),
}

impl PipelineError {
    pub fn bad_input_link(port: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::BadInputLink {
            port: port.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(name: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        PipelineError::TypeMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn processing_error(module: impl Into<String>, cause: impl Into<String>) -> Self {
        PipelineError::ProcessingError {
            module: module.into(),
            cause: cause.into(),
        }
    }

    /// Whether re-invoking the same operation (after a correction, or simply
    /// retrying) could plausibly succeed, as opposed to requiring a new
    /// descriptor entirely.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::InputLocked
                | PipelineError::ProcessingError { .. }
                | PipelineError::StageFailed(_)
                | PipelineError::Cancelled
                | PipelineError::Timeout
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::UnknownType(_)
            | PipelineError::DuplicateAlias(_)
            | PipelineError::BadInputLink { .. }
            | PipelineError::TypeMismatch { .. }
            | PipelineError::UnknownPort(_)
            | PipelineError::InvalidConfigField { .. }
            | PipelineError::UnknownValueType(_)
            | PipelineError::IncompatibleDefault(_)
            | PipelineError::InvalidConfiguration(_)
            | PipelineError::ValidationError(_) => ErrorCategory::Configuration,

            PipelineError::CyclicDependency(_)
            | PipelineError::MissingBinding(_)
            | PipelineError::InvariantViolation(_) => ErrorCategory::Structural,

            PipelineError::InputLocked
            | PipelineError::ProcessingError { .. }
            | PipelineError::StageFailed(_)
            | PipelineError::Cancelled
            | PipelineError::Timeout => ErrorCategory::Runtime,
        }
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self, PipelineError::CyclicDependency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_partitions_taxonomy() {
        assert_eq!(PipelineError::UnknownType("x".into()).category(), ErrorCategory::Configuration);
        assert_eq!(PipelineError::CyclicDependency("a->b->a".into()).category(), ErrorCategory::Structural);
        assert_eq!(PipelineError::Cancelled.category(), ErrorCategory::Runtime);
    }

    #[test]
    fn recoverable_flags_runtime_errors() {
        assert!(PipelineError::Timeout.is_recoverable());
        assert!(!PipelineError::CyclicDependency("x".into()).is_recoverable());
    }
}
