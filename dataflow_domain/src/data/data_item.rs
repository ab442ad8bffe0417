// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Data Item (C2)
//!
//! A single typed slot: identity, an immutable schema, a current value, and
//! an ordered list of change listeners. Equality and hashing are defined by
//! identity alone, never by value or schema.

use crate::error::PipelineError;
use crate::value_objects::{ItemId, Schema, Value};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, RwLock};

/// Invoked after a successful write, with the new value. Listener failures
/// are isolated from one another (§4.2): all listeners run regardless of
/// earlier failures, and the first error is what callers see.
pub type Listener = Arc<dyn Fn(&Value) -> Result<(), PipelineError> + Send + Sync>;

pub struct DataItem {
    id: ItemId,
    schema: Schema,
    value: RwLock<Option<Value>>,
    listeners: Mutex<Vec<Listener>>,
}

impl DataItem {
    pub fn from_schema(schema: Schema) -> Self {
        let initial = schema.default_value();
        Self {
            id: ItemId::new(),
            schema,
            value: RwLock::new(initial),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self) -> Option<Value> {
        self.value.read().expect("data item value lock poisoned").clone()
    }

    /// `valid` ≡ value present and satisfies schema.
    pub fn is_valid(&self) -> bool {
        match self.get() {
            Some(v) => self.schema.accepts(&v),
            None => false,
        }
    }

    /// Writes a new value and notifies listeners in registration order. A
    /// listener that fails does not stop the remaining listeners from
    /// running; the first failure is what this call returns. The write
    /// itself is never rolled back, per the resolution of the open question
    /// in the original design notes.
    pub fn set(&self, v: Value) -> Result<(), PipelineError> {
        if !self.schema.accepts(&v) {
            return Err(PipelineError::type_mismatch(
                self.id.to_string(),
                self.schema.value_type().to_string(),
                v.value_type().to_string(),
            ));
        }

        {
            let mut guard = self.value.write().expect("data item value lock poisoned");
            *guard = Some(v.clone());
        }

        let listeners: Vec<Listener> = self.listeners.lock().expect("listener lock poisoned").clone();
        let mut first_error = None;
        for listener in &listeners {
            if let Err(e) = listener(&v) {
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

    /// Clears the current value, making the item invalid again. Used when a
    /// module's run fails (§4.7: outputs cleared) or when an input is
    /// explicitly invalidated.
    pub fn clear(&self) {
        *self.value.write().expect("data item value lock poisoned") = None;
    }

    /// Appends a listener; never deduplicates, matching §4.2.
    pub fn add_listener(&self, listener: Listener) {
        self.listeners.lock().expect("listener lock poisoned").push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().expect("listener lock poisoned").len()
    }
}

impl std::fmt::Debug for DataItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataItem")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .field("value", &self.get())
            .finish()
    }
}

impl PartialEq for DataItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DataItem {}

impl Hash for DataItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_invalid_without_default() {
        let item = DataItem::from_schema(Schema::new(ValueType::Boolean));
        assert!(!item.is_valid());
    }

    #[test]
    fn default_value_makes_item_valid() {
        let schema = Schema::new(ValueType::Boolean).with_default(Value::Boolean(false)).unwrap();
        let item = DataItem::from_schema(schema);
        assert!(item.is_valid());
        assert_eq!(item.get(), Some(Value::Boolean(false)));
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let item = DataItem::from_schema(Schema::new(ValueType::Integer));
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in [1, 2, 3] {
            let order = order.clone();
            item.add_listener(Arc::new(move |_v| {
                order.lock().unwrap().push(tag);
                Ok(())
            }));
        }

        item.set(Value::Integer(1)).unwrap();
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn a_failing_listener_does_not_stop_the_others() {
        let item = DataItem::from_schema(Schema::new(ValueType::Integer));
        let calls = Arc::new(AtomicUsize::new(0));

        item.add_listener(Arc::new(|_v| Err(PipelineError::ValidationError("boom".into()))));
        let calls_clone = calls.clone();
        item.add_listener(Arc::new(move |_v| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        let result = item.set(Value::Integer(5));
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // the write itself is not rolled back
        assert_eq!(item.get(), Some(Value::Integer(5)));
    }

    #[test]
    fn type_mismatched_write_is_rejected() {
        let item = DataItem::from_schema(Schema::new(ValueType::Boolean));
        assert!(item.set(Value::Integer(1)).is_err());
    }
}
