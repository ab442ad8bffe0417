// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Identity for a compiled pipeline structure (C5).

use crate::error::PipelineError;
use crate::value_objects::generic_id::{GenericId, IdCategory};
use ulid::Ulid;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WorkflowMarker;

impl IdCategory for WorkflowMarker {
    fn category_name() -> &'static str {
        "workflow"
    }

    fn validate_id(ulid: &Ulid) -> Result<(), PipelineError> {
        if *ulid == Ulid::nil() {
            return Err(PipelineError::InvalidConfiguration(
                "workflow ID cannot be nil".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identity of a compiled `Structure`, stable across re-invocations of
/// `process` but regenerated whenever the descriptor is recompiled.
pub type WorkflowId = GenericId<WorkflowMarker>;
