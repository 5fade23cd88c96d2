// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The ordered name -> binding map behind an exports object.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use spacey_value::property::ordered_keys;
use spacey_value::{PropertyDescriptor, PropertyKey};

/// Every binding collected by one exports object.
///
/// Names are unique by construction: the map is keyed by the resolved name,
/// and entries are only ever added or overwritten, never removed.
#[derive(Debug, Default)]
pub struct ExportCollection {
    bindings: IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>,
}

impl ExportCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the binding stored under `key`
    pub fn get(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.bindings.get(key)
    }

    /// Check whether `key` is occupied
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Store a binding, replacing any existing one under the same key
    pub(crate) fn insert(&mut self, key: PropertyKey, descriptor: PropertyDescriptor) {
        self.bindings.insert(key, descriptor);
    }

    /// All names, in own-key order
    pub fn keys(&self) -> Vec<PropertyKey> {
        ordered_keys(self.bindings.keys())
    }

    /// All bindings, in own-key order
    pub fn entries(&self) -> Vec<(PropertyKey, PropertyDescriptor)> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let descriptor = self.bindings.get(&key)?.clone();
                Some((key, descriptor))
            })
            .collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing has been exported yet
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
