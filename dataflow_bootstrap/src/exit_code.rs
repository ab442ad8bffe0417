// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Mapping (§6)
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | Success |
//! | 2 | Configuration/validation failure |
//! | 3 | Cyclic pipeline |
//! | 4 | Runtime failure |
//! | 5 | Cancelled or timed out |

use dataflow_domain::{ErrorCategory, PipelineError};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    ConfigurationFailure = 2,
    CyclicPipeline = 3,
    RuntimeFailure = 4,
    CancelledOrTimedOut = 5,
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

/// Maps a `PipelineError` to its operator-facing exit code per §6.
pub fn map_error_to_exit_code(error: &PipelineError) -> ExitCode {
    if error.is_cyclic() {
        return ExitCode::CyclicPipeline;
    }
    match error {
        PipelineError::Cancelled | PipelineError::Timeout => ExitCode::CancelledOrTimedOut,
        _ => match error.category() {
            ErrorCategory::Configuration | ErrorCategory::Structural => ExitCode::ConfigurationFailure,
            ErrorCategory::Runtime => ExitCode::RuntimeFailure,
        },
    }
}

/// Converts an engine run's result directly into a process exit code,
/// logging the error (if any) before returning.
pub fn result_to_exit_code<T>(result: Result<T, PipelineError>) -> process::ExitCode {
    match result {
        Ok(_) => ExitCode::Success.into(),
        Err(e) => {
            tracing::error!(error = %e, "pipeline run failed");
            map_error_to_exit_code(&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_dependency_maps_to_cyclic_code_even_though_it_is_structural() {
        let err = PipelineError::CyclicDependency("a->b->a".into());
        assert_eq!(map_error_to_exit_code(&err), ExitCode::CyclicPipeline);
    }

    #[test]
    fn cancelled_and_timeout_map_to_the_same_code() {
        assert_eq!(map_error_to_exit_code(&PipelineError::Cancelled), ExitCode::CancelledOrTimedOut);
        assert_eq!(map_error_to_exit_code(&PipelineError::Timeout), ExitCode::CancelledOrTimedOut);
    }

    #[test]
    fn other_runtime_errors_map_to_runtime_failure() {
        let err = PipelineError::processing_error("and1", "boom");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::RuntimeFailure);
    }

    #[test]
    fn configuration_errors_map_to_configuration_failure() {
        let err = PipelineError::UnknownType("bogus".into());
        assert_eq!(map_error_to_exit_code(&err), ExitCode::ConfigurationFailure);
    }
}
