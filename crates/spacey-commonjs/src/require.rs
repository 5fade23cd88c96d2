// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The replaceable `require` resolver.
//!
//! Scripts never see the resolver directly. They call a trampoline function
//! that looks up the current resolver on every call, so replacing the
//! resolver also affects `require` references obtained earlier.

use crate::error::{CommonJsError, Result};
use spacey_value::{Function, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// A `require` implementation: module identifier in, module value out
pub type Resolver = Rc<dyn Fn(&str) -> Result<Value>>;

/// The resolver installed when none is configured. Fails for every id.
pub fn not_implemented() -> Resolver {
    Rc::new(|id: &str| -> Result<Value> { Err(CommonJsError::not_implemented(id)) })
}

/// Wraps a script value assigned to `module.require` as a resolver.
///
/// A function is called with the identifier as its only argument. Any other
/// value yields a resolver that raises a `TypeError`, which is what calling
/// that value would have done.
pub fn resolver_from_value(value: Value) -> Resolver {
    match value {
        Value::Function(func) => Rc::new(move |id: &str| -> Result<Value> {
            Ok(func.call(&Value::Undefined, &[Value::from(id)])?)
        }),
        _ => Rc::new(|_: &str| -> Result<Value> {
            Err(spacey_value::Error::type_error("require is not a function").into())
        }),
    }
}

/// The single mutable slot holding the active resolver.
pub struct RequireSlot {
    resolver: RefCell<Resolver>,
}

impl RequireSlot {
    /// Create a slot holding `resolver`
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: RefCell::new(resolver),
        }
    }

    /// Swap in a new resolver. Takes effect for every later call.
    pub fn replace(&self, resolver: Resolver) {
        debug!("replacing require resolver");
        *self.resolver.borrow_mut() = resolver;
    }

    /// Resolve `id` with whatever resolver is currently installed.
    pub fn resolve(&self, id: &str) -> Result<Value> {
        // a resolver may replace itself while running
        let resolver = Rc::clone(&self.resolver.borrow());
        resolver(id)
    }

    /// The script-visible `require` function bound to this slot.
    pub fn trampoline(self: &Rc<Self>) -> Rc<Function> {
        let slot = Rc::clone(self);
        Rc::new(Function::native("require", 1, move |_, args| {
            let id = args.first().cloned().unwrap_or_default().to_js_string();
            Ok(slot.resolve(&id)?)
        }))
    }
}

impl Default for RequireSlot {
    fn default() -> Self {
        Self::new(not_implemented())
    }
}

impl fmt::Debug for RequireSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequireSlot").finish_non_exhaustive()
    }
}
