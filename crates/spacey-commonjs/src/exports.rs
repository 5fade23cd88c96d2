// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The `exports` object.
//!
//! Every write to `exports` passes through the [`ExoticObject`] traps below,
//! which route the requested name through the [`NameAllocator`] before
//! storing the binding. Writes are always reported as successful, even when
//! they are redirected or dropped, because a strict-mode assignment that
//! reports failure throws.

use crate::collection::ExportCollection;
use crate::names::{Allocation, NameAllocator};
use spacey_value::{
    ExoticObject, Object, ObjectRef, PropertyDescriptor, PropertyKey, PropertyKind, Result, Value,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// What happened to a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The binding was stored under this key
    Bound(PropertyKey),
    /// An identical binding already lives under this key; nothing changed
    Unchanged(PropertyKey),
}

impl Assignment {
    /// The key the write resolved to
    pub fn key(&self) -> &PropertyKey {
        match self {
            Assignment::Bound(key) | Assignment::Unchanged(key) => key,
        }
    }

    /// Whether the write stored a new binding
    pub fn is_bound(&self) -> bool {
        matches!(self, Assignment::Bound(_))
    }
}

/// Handle to an exports object.
///
/// Clones share the same underlying collection.
#[derive(Debug, Clone, Default)]
pub struct Exports {
    target: Rc<ExportsTarget>,
}

#[derive(Debug, Default)]
struct ExportsTarget {
    collection: RefCell<ExportCollection>,
    allocator: NameAllocator,
}

impl Exports {
    /// Create an empty exports object
    pub fn new() -> Self {
        Self::default()
    }

    /// `exports[key] = value`
    pub fn assign(&self, key: impl Into<PropertyKey>, value: Value) -> Assignment {
        self.target.define(key.into(), PropertyDescriptor::data(value))
    }

    /// `Object.defineProperty(exports, key, descriptor)`
    ///
    /// Accessor descriptors are kept as accessors, so reads through the live
    /// view call the getter every time.
    pub fn define(&self, key: impl Into<PropertyKey>, descriptor: PropertyDescriptor) -> Assignment {
        self.target.define(key.into(), descriptor)
    }

    /// `exports[key]`, calling the getter for accessor bindings
    pub fn get(&self, key: &PropertyKey) -> Result<Value> {
        self.target.get(key, &self.to_value())
    }

    /// The binding stored under `key`
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.target.get_own_property(key)
    }

    /// Whether `key` is bound
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.target.collection.borrow().contains(key)
    }

    /// All bound names, in own-key order
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.target.own_keys()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.target.collection.borrow().len()
    }

    /// Whether nothing has been exported
    pub fn is_empty(&self) -> bool {
        self.target.collection.borrow().is_empty()
    }

    /// A point-in-time copy of every binding.
    ///
    /// Each call returns a new ordinary object. Accessors are called once and
    /// their results stored as plain values; every entry is enumerable.
    /// Later writes to `exports` and writes to the copy do not affect each
    /// other.
    pub fn snapshot(&self) -> Result<ObjectRef> {
        let receiver = self.to_value();
        let entries = self.target.collection.borrow().entries();
        let mut snapshot = Object::new();

        for (key, descriptor) in entries {
            let value = descriptor.resolve(&receiver)?;
            let writable = match descriptor.kind {
                PropertyKind::Data { writable, .. } => writable,
                PropertyKind::Accessor { .. } => true,
            };
            snapshot.define_own_property(
                key,
                PropertyDescriptor {
                    kind: PropertyKind::Data { value, writable },
                    enumerable: true,
                    configurable: descriptor.configurable,
                },
            );
        }

        Ok(Rc::new(RefCell::new(snapshot)))
    }

    /// The script-visible value for this exports object
    pub fn to_value(&self) -> Value {
        let target: Rc<dyn ExoticObject> = self.target.clone();
        Value::Exotic(target)
    }

    /// Whether `value` is this exports object
    pub fn is(&self, value: &Value) -> bool {
        value == &self.to_value()
    }

    /// Whether both handles refer to the same exports object
    pub fn ptr_eq(&self, other: &Exports) -> bool {
        Rc::ptr_eq(&self.target, &other.target)
    }
}

impl ExportsTarget {
    fn define(&self, key: PropertyKey, descriptor: PropertyDescriptor) -> Assignment {
        let mut collection = self.collection.borrow_mut();

        let name = match &key {
            // symbols are unique by identity; no renaming needed
            PropertyKey::Symbol(_) => {
                collection.insert(key.clone(), descriptor);
                return Assignment::Bound(key);
            }
            PropertyKey::String(name) => name,
        };

        match self.allocator.resolve(&collection, name, &descriptor) {
            Allocation::Existing(existing) => {
                trace!("export {} already bound as {}", name, existing);
                Assignment::Unchanged(PropertyKey::String(existing))
            }
            Allocation::Fresh(resolved) => {
                if &resolved != name {
                    debug!("export {} renamed to {}", name, resolved);
                }
                let key = PropertyKey::String(resolved);
                collection.insert(key.clone(), descriptor);
                Assignment::Bound(key)
            }
        }
    }
}

impl ExoticObject for ExportsTarget {
    fn get(&self, key: &PropertyKey, receiver: &Value) -> Result<Value> {
        // release the borrow before a getter gets a chance to run
        let descriptor = self.collection.borrow().get(key).cloned();
        match descriptor {
            Some(descriptor) => descriptor.resolve(receiver),
            None => Ok(Value::Undefined),
        }
    }

    fn set(&self, key: PropertyKey, value: Value) -> Result<bool> {
        self.define(key, PropertyDescriptor::data(value));
        Ok(true)
    }

    fn define_own_property(&self, key: PropertyKey, descriptor: PropertyDescriptor) -> bool {
        self.define(key, descriptor);
        true
    }

    fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.collection.borrow().get(key).cloned()
    }

    fn own_keys(&self) -> Vec<PropertyKey> {
        self.collection.borrow().keys()
    }

    // every binding is listed, like the snapshot
    fn enumerable_keys(&self) -> Vec<String> {
        self.collection
            .borrow()
            .keys()
            .into_iter()
            .filter_map(|key| match key {
                PropertyKey::String(name) => Some(name),
                PropertyKey::Symbol(_) => None,
            })
            .collect()
    }

    fn prevent_extensions(&self) -> bool {
        trace!("ignoring preventExtensions on exports");
        false
    }

    fn set_prototype_of(&self, _prototype: &Value) -> bool {
        trace!("ignoring setPrototypeOf on exports");
        false
    }
}
