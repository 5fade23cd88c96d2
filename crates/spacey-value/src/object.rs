// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! JavaScript object representation.

use crate::error::Result;
use crate::property::{ordered_keys, PropertyDescriptor, PropertyKey, PropertyKind};
use crate::value::Value;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to an ordinary object.
pub type ObjectRef = Rc<RefCell<Object>>;

/// Shared handle to an array's elements.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Insertion-ordered property storage.
pub type PropertyMap = IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>;

/// What created an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// Object literal or `Object.create`-style object
    Ordinary,
    /// Instance of a class or constructor other than `Object`
    Instance {
        /// The constructor's name
        constructor: String,
    },
}

/// A JavaScript object.
#[derive(Debug, Clone)]
pub struct Object {
    /// What created this object
    pub kind: ObjectKind,
    /// The properties
    properties: PropertyMap,
    /// Whether the object is extensible
    pub extensible: bool,
}

impl Object {
    /// Creates a new empty object.
    pub fn new() -> Self {
        Self {
            kind: ObjectKind::Ordinary,
            properties: PropertyMap::default(),
            extensible: true,
        }
    }

    /// Creates an empty instance of the named constructor.
    pub fn instance(constructor: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Instance {
                constructor: constructor.into(),
            },
            ..Self::new()
        }
    }

    /// Gets a property descriptor.
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    /// Gets a data property's value without invoking accessors.
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.properties.get(key).map(PropertyDescriptor::value)
    }

    /// Sets a data property, creating it if it doesn't exist.
    ///
    /// Returns false if the property is read-only or the object is not
    /// extensible. Accessors are replaced only if configurable.
    pub fn set(&mut self, key: PropertyKey, value: Value) -> bool {
        match self.properties.get_mut(&key) {
            Some(PropertyDescriptor {
                kind: PropertyKind::Data { value: slot, writable },
                ..
            }) => {
                if *writable {
                    *slot = value;
                }
                *writable
            }
            Some(_) => false,
            None if self.extensible => {
                self.properties.insert(key, PropertyDescriptor::data(value));
                true
            }
            None => false,
        }
    }

    /// Defines (or redefines) a property.
    pub fn define_own_property(&mut self, key: PropertyKey, descriptor: PropertyDescriptor) -> bool {
        match self.properties.get(&key) {
            Some(existing) if !existing.configurable => false,
            Some(_) => {
                self.properties.insert(key, descriptor);
                true
            }
            None if self.extensible => {
                self.properties.insert(key, descriptor);
                true
            }
            None => false,
        }
    }

    /// Deletes a property.
    pub fn delete(&mut self, key: &PropertyKey) -> bool {
        match self.properties.get(key) {
            Some(descriptor) if !descriptor.configurable => false,
            Some(_) => {
                self.properties.shift_remove(key);
                true
            }
            None => true,
        }
    }

    /// Checks if a property exists.
    pub fn has(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    /// Number of own properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// All own keys, in own-key order.
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        ordered_keys(self.properties.keys())
    }

    /// Own enumerable string keys, in own-key order (`Object.keys`).
    pub fn keys(&self) -> Vec<String> {
        self.own_keys()
            .into_iter()
            .filter_map(|key| {
                let enumerable = self.properties.get(&key)?.enumerable;
                match key {
                    PropertyKey::String(name) if enumerable => Some(name),
                    _ => None,
                }
            })
            .collect()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<PropertyKey>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.set(key.into(), value);
        }
        object
    }
}

/// Reads a property, calling its getter with `receiver` as `this`.
///
/// The object is not borrowed while the getter runs, so getters may freely
/// touch the object themselves.
pub fn get(object: &ObjectRef, key: &PropertyKey, receiver: &Value) -> Result<Value> {
    let descriptor = object.borrow().get_own_property(key).cloned();
    match descriptor {
        Some(descriptor) => descriptor.resolve(receiver),
        None => Ok(Value::Undefined),
    }
}

/// Writes a property, calling its setter with `receiver` as `this`.
pub fn put(object: &ObjectRef, key: PropertyKey, value: Value, receiver: &Value) -> Result<bool> {
    let accessor = object
        .borrow()
        .get_own_property(&key)
        .filter(|descriptor| descriptor.is_accessor())
        .map(|descriptor| descriptor.setter().cloned());

    match accessor {
        Some(Some(setter)) => {
            setter.call(receiver, &[value])?;
            Ok(true)
        }
        Some(None) => Ok(false),
        None => Ok(object.borrow_mut().set(key, value)),
    }
}
