// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Property keys and property descriptors.

use crate::function::Function;
use crate::value::{Symbol, Value};
use std::fmt;
use std::rc::Rc;

/// Property key (string or symbol)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String-named property
    String(String),
    /// Symbol-keyed property
    Symbol(Symbol),
}

impl PropertyKey {
    /// The key as a string, unless it is a symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// Check if this is a symbol key
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// The array index this key denotes, if it is a canonical one.
    pub fn as_array_index(&self) -> Option<u32> {
        let s = self.as_str()?;
        let index: u32 = s.parse().ok()?;
        (index != u32::MAX && index.to_string() == s).then_some(index)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Orders keys the way ordinary objects enumerate them: array indices
/// ascending, then other strings in insertion order, then symbols in
/// insertion order.
pub fn ordered_keys<'a>(keys: impl Iterator<Item = &'a PropertyKey>) -> Vec<PropertyKey> {
    let mut indices = Vec::new();
    let mut strings = Vec::new();
    let mut symbols = Vec::new();

    for key in keys {
        match key {
            PropertyKey::Symbol(_) => symbols.push(key.clone()),
            PropertyKey::String(_) => match key.as_array_index() {
                Some(index) => indices.push((index, key.clone())),
                None => strings.push(key.clone()),
            },
        }
    }

    indices.sort_by_key(|(index, _)| *index);
    indices
        .into_iter()
        .map(|(_, key)| key)
        .chain(strings)
        .chain(symbols)
        .collect()
}

/// What a property holds.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// A stored value
    Data {
        /// The property value
        value: Value,
        /// Whether the property is writable
        writable: bool,
    },
    /// A computed property
    Accessor {
        /// Getter function
        get: Option<Rc<Function>>,
        /// Setter function
        set: Option<Rc<Function>>,
    },
}

/// A property descriptor.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// Data or accessor payload
    pub kind: PropertyKind,
    /// Whether the property is enumerable
    pub enumerable: bool,
    /// Whether the property is configurable
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// A writable, enumerable, configurable data property; what a plain
    /// assignment creates.
    pub fn data(value: Value) -> Self {
        Self {
            kind: PropertyKind::Data { value, writable: true },
            enumerable: true,
            configurable: true,
        }
    }

    /// An enumerable, configurable accessor property.
    pub fn accessor(get: Option<Rc<Function>>, set: Option<Rc<Function>>) -> Self {
        Self {
            kind: PropertyKind::Accessor { get, set },
            enumerable: true,
            configurable: true,
        }
    }

    /// Builder: set enumerability.
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Builder: set configurability.
    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Check if this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor { .. })
    }

    /// The stored value; `undefined` for accessors.
    pub fn value(&self) -> Value {
        match &self.kind {
            PropertyKind::Data { value, .. } => value.clone(),
            PropertyKind::Accessor { .. } => Value::Undefined,
        }
    }

    /// The getter, if this is an accessor with one.
    pub fn getter(&self) -> Option<&Rc<Function>> {
        match &self.kind {
            PropertyKind::Accessor { get, .. } => get.as_ref(),
            PropertyKind::Data { .. } => None,
        }
    }

    /// The setter, if this is an accessor with one.
    pub fn setter(&self) -> Option<&Rc<Function>> {
        match &self.kind {
            PropertyKind::Accessor { set, .. } => set.as_ref(),
            PropertyKind::Data { .. } => None,
        }
    }

    /// Resolves the descriptor to a value, calling the getter with
    /// `receiver` as `this`.
    pub fn resolve(&self, receiver: &Value) -> crate::Result<Value> {
        match &self.kind {
            PropertyKind::Data { value, .. } => Ok(value.clone()),
            PropertyKind::Accessor { get: Some(get), .. } => get.call(receiver, &[]),
            PropertyKind::Accessor { get: None, .. } => Ok(Value::Undefined),
        }
    }
}
