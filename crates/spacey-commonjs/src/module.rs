// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The `module` object.
//!
//! `module` is an ordinary object carrying three accessor properties:
//!
//! - `exports`: reads return the live exports object; writes are
//!   whole-module reassignments (see [`reassign`])
//! - `exported`: read-only; every read returns a fresh snapshot
//! - `require`: reads return the `require` trampoline; writes replace the
//!   resolver behind it
//!
//! Any other property behaves as it would on a plain object.

use crate::error::Result;
use crate::exports::Exports;
use crate::names::default_export_name;
use crate::require::{resolver_from_value, RequireSlot};
use spacey_value::{Function, Object, ObjectRef, PropertyDescriptor, PropertyKey, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A CommonJS `module` object
#[derive(Debug, Clone)]
pub struct Module {
    object: ObjectRef,
    exports: Exports,
    slot: Rc<RequireSlot>,
    require: Rc<Function>,
}

impl Module {
    /// Create a module over `exports`, resolving `require` calls through
    /// `slot`.
    pub fn new(exports: Exports, slot: Rc<RequireSlot>) -> Self {
        let require = slot.trampoline();
        let mut object = Object::new();

        let live = exports.clone();
        let target = exports.clone();
        object.define_own_property(
            "exports".into(),
            PropertyDescriptor::accessor(
                Some(Rc::new(Function::native("exports", 0, move |_, _| {
                    Ok(live.to_value())
                }))),
                Some(Rc::new(Function::native("exports", 1, move |_, args| {
                    let value = args.first().cloned().unwrap_or_default();
                    reassign(&target, value)?;
                    Ok(Value::Undefined)
                }))),
            ),
        );

        let source = exports.clone();
        object.define_own_property(
            "exported".into(),
            PropertyDescriptor::accessor(
                Some(Rc::new(Function::native("exported", 0, move |_, _| {
                    Ok(Value::Object(source.snapshot()?))
                }))),
                None,
            ),
        );

        let trampoline = Rc::clone(&require);
        let replaceable = Rc::clone(&slot);
        object.define_own_property(
            "require".into(),
            PropertyDescriptor::accessor(
                Some(Rc::new(Function::native("require", 0, move |_, _| {
                    Ok(Value::Function(Rc::clone(&trampoline)))
                }))),
                Some(Rc::new(Function::native("require", 1, move |_, args| {
                    let value = args.first().cloned().unwrap_or_default();
                    replaceable.replace(resolver_from_value(value));
                    Ok(Value::Undefined)
                }))),
            ),
        );

        Self {
            object: Rc::new(RefCell::new(object)),
            exports,
            slot,
            require,
        }
    }

    /// The live exports object (`module.exports`)
    pub fn exports(&self) -> &Exports {
        &self.exports
    }

    /// `module.exports = value`
    pub fn set_exports(&self, value: Value) -> Result<()> {
        reassign(&self.exports, value)
    }

    /// A snapshot of every export (`module.exported`)
    pub fn exported(&self) -> Result<ObjectRef> {
        Ok(self.exports.snapshot()?)
    }

    /// The `require` trampoline (`module.require`)
    pub fn require(&self) -> Rc<Function> {
        Rc::clone(&self.require)
    }

    /// Replace the resolver behind `require`
    pub fn set_require(&self, resolver: impl Fn(&str) -> Result<Value> + 'static) {
        self.slot.replace(Rc::new(resolver));
    }

    /// `module.require = value`, as a script would write it
    pub fn set_require_value(&self, value: Value) {
        self.slot.replace(resolver_from_value(value));
    }

    /// The underlying object
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// The script-visible value for this module
    pub fn to_value(&self) -> Value {
        Value::Object(Rc::clone(&self.object))
    }
}

/// Whole-module reassignment.
///
/// A plain object has each of its own enumerable string keys exported by
/// name first. The value itself is then exported under its function name,
/// or `default` for anything else.
pub fn reassign(exports: &Exports, value: Value) -> Result<()> {
    if let Value::Object(object) = &value {
        if value.is_plain_object() {
            let keys = object.borrow().keys();
            debug!("expanding {} keys from module.exports", keys.len());

            for key in keys {
                let item = value.get(&PropertyKey::from(key.as_str()))?;
                exports.assign(key, item);
            }
        }
    }

    let name = default_export_name(&value);
    exports.assign(name, value);
    Ok(())
}
