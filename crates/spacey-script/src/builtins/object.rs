// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `Object` namespace functions.
//!
//! Exotic targets (such as the CommonJS `exports` object) receive the
//! descriptor exactly as written, completed with default attributes; the
//! object's traps decide what happens to it.

use spacey_value::{
    Error, Function, Object, PropertyDescriptor, PropertyKey, PropertyKind, Result, Value, object,
};
use std::rc::Rc;

/// Object.defineProperty(target, key, descriptor)
pub fn object_define_property(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let key = arg(args, 1).to_property_key();
    let fields = DescriptorFields::from_value(&arg(args, 2))?;

    match &target {
        Value::Object(object) => {
            let descriptor = fields.complete(object.borrow().get_own_property(&key));
            let mut object = object.borrow_mut();
            let is_new = !object.has(&key);
            if !object.define_own_property(key.clone(), descriptor) {
                return Err(if is_new {
                    Error::type_error(format!(
                        "Cannot define property {}, object is not extensible",
                        key
                    ))
                } else {
                    Error::type_error(format!("Cannot redefine property: {}", key))
                });
            }
        }
        Value::Exotic(exotic) => {
            if !exotic.define_own_property(key.clone(), fields.complete(None)) {
                return Err(Error::type_error(format!("Cannot redefine property: {}", key)));
            }
        }
        Value::Array(_) | Value::Function(_) => {
            return Err(Error::type_error(format!(
                "Cannot define property {} on this object",
                key
            )));
        }
        _ => return Err(Error::type_error("Object.defineProperty called on non-object")),
    }

    Ok(target)
}

/// Object.getOwnPropertyDescriptor(target, key)
pub fn object_get_own_property_descriptor(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let key = arg(args, 1).to_property_key();

    let descriptor = match &target {
        Value::Undefined | Value::Null => return Err(nullish_error()),
        Value::Object(object) => object.borrow().get_own_property(&key).cloned(),
        Value::Exotic(exotic) => exotic.get_own_property(&key),
        _ => None,
    };

    Ok(descriptor.map(descriptor_to_value).unwrap_or_default())
}

/// Object.keys(target)
pub fn object_keys(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let keys = own_keys(&target)?;
    Ok(Value::array(keys.into_iter().map(Value::from).collect()))
}

/// Object.values(target)
pub fn object_values(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let values = own_keys(&target)?
        .into_iter()
        .map(|key| target.get(&PropertyKey::from(key)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::array(values))
}

/// Object.entries(target)
pub fn object_entries(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let entries = own_keys(&target)?
        .into_iter()
        .map(|key| {
            let value = target.get(&PropertyKey::from(key.as_str()))?;
            Ok(Value::array(vec![Value::from(key), value]))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::array(entries))
}

/// Object.is(a, b)
pub fn object_is(_this: &Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(arg(args, 0).same_value(&arg(args, 1))))
}

/// Object.preventExtensions(target)
///
/// A refusal from an exotic object is not reported.
pub fn object_prevent_extensions(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    match &target {
        Value::Object(object) => object.borrow_mut().extensible = false,
        Value::Exotic(exotic) => {
            exotic.prevent_extensions();
        }
        _ => {}
    }
    Ok(target)
}

/// Object.isExtensible(target)
pub fn object_is_extensible(_this: &Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(match arg(args, 0) {
        Value::Object(object) => object.borrow().extensible,
        Value::Array(_) | Value::Function(_) | Value::Exotic(_) => true,
        _ => false,
    }))
}

/// Object.setPrototypeOf(target, prototype)
///
/// Ordinary objects have no prototype chain here, so only exotic objects
/// see the request.
pub fn object_set_prototype_of(_this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let prototype = arg(args, 1);

    if target.is_nullish() {
        return Err(Error::type_error("Object.setPrototypeOf called on null or undefined"));
    }
    if !prototype.is_null() && !matches!(prototype.type_of(), "object" | "function") {
        return Err(Error::type_error(format!(
            "Object prototype may only be an Object or null: {}",
            prototype.to_js_string()
        )));
    }

    if let Value::Exotic(exotic) = &target {
        exotic.set_prototype_of(&prototype);
    }
    Ok(target)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn nullish_error() -> Error {
    Error::type_error("Cannot convert undefined or null to object")
}

fn own_keys(target: &Value) -> Result<Vec<String>> {
    if target.is_nullish() {
        return Err(nullish_error());
    }
    Ok(target.keys())
}

/// The attributes present on a descriptor object.
#[derive(Debug, Default)]
struct DescriptorFields {
    value: Option<Value>,
    writable: Option<bool>,
    get: Option<Option<Rc<Function>>>,
    set: Option<Option<Rc<Function>>>,
    enumerable: Option<bool>,
    configurable: Option<bool>,
}

impl DescriptorFields {
    fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(Error::type_error(format!(
                "Property description must be an object: {}",
                value.to_js_string()
            )));
        };

        let field = |name: &str| -> Result<Option<Value>> {
            let key = PropertyKey::from(name);
            if object.borrow().has(&key) {
                Ok(Some(object::get(object, &key, value)?))
            } else {
                Ok(None)
            }
        };
        let accessor = |name: &str, label: &str| -> Result<Option<Option<Rc<Function>>>> {
            match field(name)? {
                None => Ok(None),
                Some(Value::Undefined) => Ok(Some(None)),
                Some(Value::Function(func)) => Ok(Some(Some(func))),
                Some(other) => Err(Error::type_error(format!(
                    "{} must be a function: {}",
                    label,
                    other.inspect()
                ))),
            }
        };

        let fields = Self {
            enumerable: field("enumerable")?.map(|v| v.to_boolean()),
            configurable: field("configurable")?.map(|v| v.to_boolean()),
            value: field("value")?,
            writable: field("writable")?.map(|v| v.to_boolean()),
            get: accessor("get", "Getter")?,
            set: accessor("set", "Setter")?,
        };

        let is_accessor = fields.get.is_some() || fields.set.is_some();
        if is_accessor && (fields.value.is_some() || fields.writable.is_some()) {
            return Err(Error::type_error(
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            ));
        }

        Ok(fields)
    }

    /// Fills in missing attributes from `existing`, or with defaults.
    fn complete(self, existing: Option<&PropertyDescriptor>) -> PropertyDescriptor {
        let (enumerable, configurable) = existing
            .map(|d| (d.enumerable, d.configurable))
            .unwrap_or((false, false));

        let kind = if self.get.is_some() || self.set.is_some() {
            let (old_get, old_set) = match existing.map(|d| &d.kind) {
                Some(PropertyKind::Accessor { get, set }) => (get.clone(), set.clone()),
                _ => (None, None),
            };
            PropertyKind::Accessor {
                get: self.get.unwrap_or(old_get),
                set: self.set.unwrap_or(old_set),
            }
        } else {
            match existing.map(|d| &d.kind) {
                Some(PropertyKind::Data { value, writable }) => PropertyKind::Data {
                    value: self.value.unwrap_or_else(|| value.clone()),
                    writable: self.writable.unwrap_or(*writable),
                },
                Some(accessor @ PropertyKind::Accessor { .. })
                    if self.value.is_none() && self.writable.is_none() =>
                {
                    accessor.clone()
                }
                _ => PropertyKind::Data {
                    value: self.value.unwrap_or_default(),
                    writable: self.writable.unwrap_or(false),
                },
            }
        };

        PropertyDescriptor {
            kind,
            enumerable: self.enumerable.unwrap_or(enumerable),
            configurable: self.configurable.unwrap_or(configurable),
        }
    }
}

fn descriptor_to_value(descriptor: PropertyDescriptor) -> Value {
    let mut object = Object::new();
    match descriptor.kind {
        PropertyKind::Data { value, writable } => {
            object.set("value".into(), value);
            object.set("writable".into(), Value::Boolean(writable));
        }
        PropertyKind::Accessor { get, set } => {
            object.set("get".into(), get.map(Value::from).unwrap_or_default());
            object.set("set".into(), set.map(Value::from).unwrap_or_default());
        }
    }
    object.set("enumerable".into(), Value::Boolean(descriptor.enumerable));
    object.set("configurable".into(), Value::Boolean(descriptor.configurable));
    Value::object(object)
}
