// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Schema (C1)
//!
//! `(type, default?, nullable?)` attached immutably to every port and data
//! item. `default` may be a literal value or a zero-arg producer, applied at
//! item construction time.

use super::value::Value;
use super::value_type::ValueType;
use crate::data::data_item::DataItem;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a schema's default value is supplied.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(v) => v.clone(),
            DefaultValue::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Wire representation of a schema, as emitted by `to_serializable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDto {
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub nullable: bool,
}

/// Immutable per-port schema: the type contract a `DataItem` must satisfy.
#[derive(Debug, Clone)]
pub struct Schema {
    value_type: ValueType,
    default: Option<DefaultValue>,
    nullable: bool,
}

impl Schema {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            default: None,
            nullable: false,
        }
    }

    pub fn with_default(mut self, default: Value) -> Result<Self, PipelineError> {
        if !default.matches_type(self.value_type) {
            return Err(PipelineError::IncompatibleDefault(self.value_type.to_string()));
        }
        self.default = Some(DefaultValue::Literal(default));
        Ok(self)
    }

    pub fn with_default_producer(mut self, producer: Arc<dyn Fn() -> Value + Send + Sync>) -> Self {
        self.default = Some(DefaultValue::Producer(producer));
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::produce)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        value.matches_type(self.value_type)
    }

    /// Parses a schema from its registered type name, per C1: unknown names
    /// fail with `UnknownType`.
    pub fn from_type_name(name: &str) -> Result<Self, PipelineError> {
        ValueType::from_name(name)
            .map(Schema::new)
            .ok_or_else(|| PipelineError::UnknownType(name.to_string()))
    }

    /// Creates a fresh `DataItem` bound to this schema, applying the default
    /// value (if any) at construction time.
    pub fn create_item(&self) -> DataItem {
        DataItem::from_schema(self.clone())
    }

    pub fn to_serializable(&self) -> SchemaDto {
        SchemaDto {
            value_type: self.value_type.name().to_string(),
            default: self.default_value(),
            nullable: self.nullable,
        }
    }
}
