// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Identity for a single data item (C2). Equality and hashing of a
//! `DataItem` are defined entirely in terms of this id.

use crate::error::PipelineError;
use crate::value_objects::generic_id::{GenericId, IdCategory};
use ulid::Ulid;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemMarker;

impl IdCategory for ItemMarker {
    fn category_name() -> &'static str {
        "item"
    }

    fn validate_id(ulid: &Ulid) -> Result<(), PipelineError> {
        if *ulid == Ulid::nil() {
            return Err(PipelineError::InvalidConfiguration(
                "item ID cannot be nil".to_string(),
            ));
        }
        Ok(())
    }
}

/// Opaque unique identity of a `DataItem`.
pub type ItemId = GenericId<ItemMarker>;
