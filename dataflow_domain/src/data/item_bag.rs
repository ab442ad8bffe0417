// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Item Bags (C2)
//!
//! An ordered `name → DataItem` mapping. `InputBag` additionally enforces a
//! `writable` flag (disabled while a run drives the owning module);
//! `OutputBag` is always writable by the owning module's `process`.

use crate::data::data_item::DataItem;
use crate::error::PipelineError;
use crate::value_objects::{Schema, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Core ordered collection shared by `InputBag` and `OutputBag`.
struct Bag {
    order: Vec<String>,
    items: HashMap<String, Arc<DataItem>>,
}

impl Bag {
    fn from_schemas(schemas: impl IntoIterator<Item = (String, Schema)>) -> Self {
        let mut order = Vec::new();
        let mut items = HashMap::new();
        for (name, schema) in schemas {
            items.insert(name.clone(), Arc::new(schema.create_item()));
            order.push(name);
        }
        Self { order, items }
    }

    fn get(&self, name: &str) -> Option<Arc<DataItem>> {
        self.items.get(name).cloned()
    }

    fn names(&self) -> &[String] {
        &self.order
    }

    fn all_valid(&self) -> bool {
        self.order.iter().all(|n| self.items[n].is_valid())
    }

    fn validate_names(&self, values: &HashMap<String, Value>) -> Result<(), PipelineError> {
        for name in values.keys() {
            if !self.items.contains_key(name) {
                return Err(PipelineError::UnknownPort(name.clone()));
            }
        }
        Ok(())
    }

    fn write_values(&self, values: HashMap<String, Value>) -> Result<(), PipelineError> {
        self.validate_names(&values)?;
        let mut first_error = None;
        for (name, value) in values {
            if let Err(e) = self.items[&name].set(value) {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// A module's input bag. Mutation is rejected with `InputLocked` while
/// `writable` is false, which the scheduler sets during an in-flight run.
pub struct InputBag {
    bag: Bag,
    writable: AtomicBool,
}

impl InputBag {
    pub fn from_schemas(schemas: impl IntoIterator<Item = (String, Schema)>) -> Self {
        Self {
            bag: Bag::from_schemas(schemas),
            writable: AtomicBool::new(true),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<DataItem>> {
        self.bag.get(name)
    }

    pub fn names(&self) -> &[String] {
        self.bag.names()
    }

    pub fn all_valid(&self) -> bool {
        self.bag.all_valid()
    }

    pub fn is_writable(&self) -> bool {
        self.writable.load(Ordering::SeqCst)
    }

    pub fn lock_writes(&self) {
        self.writable.store(false, Ordering::SeqCst);
    }

    pub fn unlock_writes(&self) {
        self.writable.store(true, Ordering::SeqCst);
    }

    pub fn set_values(&self, values: HashMap<String, Value>) -> Result<(), PipelineError> {
        if !self.is_writable() {
            return Err(PipelineError::InputLocked);
        }
        self.bag.write_values(values)
    }
}

/// A module's output bag; always writable by the owning module's `process`.
pub struct OutputBag {
    bag: Bag,
}

impl OutputBag {
    pub fn from_schemas(schemas: impl IntoIterator<Item = (String, Schema)>) -> Self {
        Self {
            bag: Bag::from_schemas(schemas),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<DataItem>> {
        self.bag.get(name)
    }

    pub fn names(&self) -> &[String] {
        self.bag.names()
    }

    pub fn all_valid(&self) -> bool {
        self.bag.all_valid()
    }

    pub fn set_values(&self, values: HashMap<String, Value>) -> Result<(), PipelineError> {
        self.bag.write_values(values)
    }

    pub fn clear(&self) {
        for name in self.bag.names() {
            self.bag.items[name].clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ValueType;

    fn bool_schemas(names: &[&str]) -> Vec<(String, Schema)> {
        names.iter().map(|n| (n.to_string(), Schema::new(ValueType::Boolean))).collect()
    }

    #[test]
    fn unknown_port_is_rejected() {
        let bag = InputBag::from_schemas(bool_schemas(&["a"]));
        let mut values = HashMap::new();
        values.insert("b".to_string(), Value::Boolean(true));
        assert!(matches!(bag.set_values(values), Err(PipelineError::UnknownPort(_))));
    }

    #[test]
    fn locked_input_bag_rejects_writes() {
        let bag = InputBag::from_schemas(bool_schemas(&["a"]));
        bag.lock_writes();
        let mut values = HashMap::new();
        values.insert("a".to_string(), Value::Boolean(true));
        assert!(matches!(bag.set_values(values), Err(PipelineError::InputLocked)));
    }

    #[test]
    fn all_valid_requires_every_item_present() {
        let bag = InputBag::from_schemas(bool_schemas(&["a", "b"]));
        assert!(!bag.all_valid());
        let mut values = HashMap::new();
        values.insert("a".to_string(), Value::Boolean(true));
        values.insert("b".to_string(), Value::Boolean(false));
        bag.set_values(values).unwrap();
        assert!(bag.all_valid());
    }

    #[test]
    fn output_bag_clear_invalidates_all_items() {
        let bag = OutputBag::from_schemas(bool_schemas(&["y"]));
        let mut values = HashMap::new();
        values.insert("y".to_string(), Value::Boolean(true));
        bag.set_values(values).unwrap();
        assert!(bag.all_valid());
        bag.clear();
        assert!(!bag.all_valid());
    }
}
