// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Built-in objects available to scripts.
//!
//! - `globalThis`, `undefined`, `NaN`, `Infinity`
//! - `Object` namespace: `defineProperty`, `getOwnPropertyDescriptor`,
//!   `keys`, `values`, `entries`, `is`, `preventExtensions`, `isExtensible`,
//!   `setPrototypeOf`
//! - `Symbol(description)`
//! - `console.log`, `console.info`, `console.warn`, `console.error`
//!
//! Built-ins are non-enumerable, so they never show up when the global
//! object is inspected.

pub mod console;
pub mod global;
pub mod object;

use spacey_value::{Function, Object, ObjectRef, PropertyDescriptor, Result, Value};

/// Install every built-in into `globals`.
pub fn register_builtins(globals: &ObjectRef) {
    let this = Value::Object(ObjectRef::clone(globals));
    let mut globals = globals.borrow_mut();

    hidden(&mut globals, "globalThis", this);
    for (name, descriptor) in global::constants() {
        globals.define_own_property(name.into(), descriptor);
    }

    hidden(&mut globals, "Object", Value::object(object_namespace()));
    hidden(&mut globals, "Symbol", make_native("Symbol", 0, global::symbol));
    hidden(&mut globals, "console", Value::object(console_namespace()));
}

fn object_namespace() -> Object {
    let mut namespace = Object::new();
    method(&mut namespace, "defineProperty", 3, object::object_define_property);
    method(
        &mut namespace,
        "getOwnPropertyDescriptor",
        2,
        object::object_get_own_property_descriptor,
    );
    method(&mut namespace, "keys", 1, object::object_keys);
    method(&mut namespace, "values", 1, object::object_values);
    method(&mut namespace, "entries", 1, object::object_entries);
    method(&mut namespace, "is", 2, object::object_is);
    method(&mut namespace, "preventExtensions", 1, object::object_prevent_extensions);
    method(&mut namespace, "isExtensible", 1, object::object_is_extensible);
    method(&mut namespace, "setPrototypeOf", 2, object::object_set_prototype_of);
    namespace
}

fn console_namespace() -> Object {
    let mut namespace = Object::new();
    method(&mut namespace, "log", 0, console::console_log);
    method(&mut namespace, "info", 0, console::console_log);
    method(&mut namespace, "warn", 0, console::console_error);
    method(&mut namespace, "error", 0, console::console_error);
    namespace
}

/// Create a native function value.
fn make_native(name: &str, arity: usize, func: fn(&Value, &[Value]) -> Result<Value>) -> Value {
    Value::from(Function::native(name, arity, func))
}

fn method(
    object: &mut Object,
    name: &str,
    arity: usize,
    func: fn(&Value, &[Value]) -> Result<Value>,
) {
    hidden(object, name, make_native(name, arity, func));
}

fn hidden(object: &mut Object, name: &str, value: Value) {
    object.define_own_property(name.into(), PropertyDescriptor::data(value).with_enumerable(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_value::PropertyKey;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn globals() -> ObjectRef {
        let globals = Rc::new(RefCell::new(Object::new()));
        register_builtins(&globals);
        globals
    }

    #[test]
    fn test_builtins_are_hidden() {
        let globals = globals();
        assert!(globals.borrow().keys().is_empty());
        assert!(globals.borrow().has(&PropertyKey::from("Object")));
    }

    #[test]
    fn test_global_this_is_the_global_object() {
        let globals = globals();
        let this = globals.borrow().get(&"globalThis".into()).unwrap();
        assert_eq!(this, Value::Object(globals.clone()));
    }

    #[test]
    fn test_object_methods_are_named() {
        let globals = globals();
        let namespace = globals.borrow().get(&"Object".into()).unwrap();
        let keys = namespace.get(&"keys".into()).unwrap();
        assert_eq!(keys.inspect(), "[Function: keys]");
    }
}
