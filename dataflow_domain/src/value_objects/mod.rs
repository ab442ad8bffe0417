// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects (C1): immutable, identity-free types shared across the
//! domain — the type/schema model, aliases and addresses, and the
//! type-safe ID families built on `GenericId`.

pub mod alias;
pub mod generic_id;
pub mod item_id;
pub mod schema;
pub mod stage_number;
pub mod value;
pub mod value_type;
pub mod workflow_id;

pub use alias::{Address, Alias};
pub use generic_id::{GenericId, IdCategory};
pub use item_id::ItemId;
pub use schema::{DefaultValue, Schema, SchemaDto};
pub use stage_number::StageNumber;
pub use value::Value;
pub use value_type::ValueType;
pub use workflow_id::WorkflowId;
