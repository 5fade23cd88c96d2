// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Exotic objects: objects whose internal methods are supplied by the host.
//!
//! This is the Rust counterpart of a `Proxy` handler. Every property access
//! a script performs on an exotic value is routed through one of these
//! traps, which lets the host intercept writes, synthesize reads and refuse
//! structural changes.

use crate::error::Result;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::Value;
use std::fmt;

/// The internal methods of an exotic object.
pub trait ExoticObject: fmt::Debug {
    /// `[[Get]]`: reads `key`, with `receiver` as `this` for getters.
    fn get(&self, key: &PropertyKey, receiver: &Value) -> Result<Value>;

    /// `[[Set]]`: writes `key`. Returns whether the write is reported as
    /// successful.
    fn set(&self, key: PropertyKey, value: Value) -> Result<bool>;

    /// `[[DefineOwnProperty]]`.
    fn define_own_property(&self, key: PropertyKey, descriptor: PropertyDescriptor) -> bool;

    /// `[[GetOwnProperty]]`.
    fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor>;

    /// `[[OwnPropertyKeys]]`.
    fn own_keys(&self) -> Vec<PropertyKey>;

    /// The string keys `Object.keys` reports: enumerable ones unless
    /// overridden.
    fn enumerable_keys(&self) -> Vec<String> {
        self.own_keys()
            .into_iter()
            .filter_map(|key| {
                let enumerable = self
                    .get_own_property(&key)
                    .is_some_and(|descriptor| descriptor.enumerable);
                match key {
                    PropertyKey::String(name) if enumerable => Some(name),
                    _ => None,
                }
            })
            .collect()
    }

    /// `[[PreventExtensions]]`. Refused unless overridden.
    fn prevent_extensions(&self) -> bool {
        false
    }

    /// `[[SetPrototypeOf]]`. Refused unless overridden.
    fn set_prototype_of(&self, _prototype: &Value) -> bool {
        false
    }
}
