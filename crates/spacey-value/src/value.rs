// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! JavaScript value representation.

use crate::error::{Error, Result};
use crate::exotic::ExoticObject;
use crate::function::Function;
use crate::object::{self, ArrayRef, Object, ObjectKind, ObjectRef};
use crate::property::{PropertyDescriptor, PropertyKey, PropertyKind};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Nesting depth after which `inspect` abbreviates objects.
const INSPECT_DEPTH: usize = 2;

/// A JavaScript value.
///
/// Reference values (objects, arrays, functions, exotic objects) are shared
/// handles; cloning a `Value` never copies the referent.
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Symbol
    Symbol(Symbol),
    /// Ordinary object
    Object(ObjectRef),
    /// Array
    Array(ArrayRef),
    /// Function
    Function(Rc<Function>),
    /// Proxy-like object whose behaviour is defined by traps
    Exotic(Rc<dyn ExoticObject>),
}

impl PartialEq for Value {
    /// Strict equality (`===`).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Exotic(a), Value::Exotic(b)) => same_exotic(a, b),
            _ => false,
        }
    }
}

fn same_exotic(a: &Rc<dyn ExoticObject>, b: &Rc<dyn ExoticObject>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

impl Value {
    /// Wraps an ordinary object.
    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Creates an array from its elements.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Returns true if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is nullish (null or undefined).
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns true if this value is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns true for ordinary objects that are not class instances.
    ///
    /// Arrays, functions, exotic objects and `null` are never plain, and
    /// neither is an object carrying its own truthy `constructor`.
    pub fn is_plain_object(&self) -> bool {
        let Value::Object(object) = self else {
            return false;
        };
        let object = object.borrow();
        if object.kind != ObjectKind::Ordinary {
            return false;
        }
        match object.get_own_property(&PropertyKey::from("constructor")) {
            None => true,
            Some(descriptor) => match &descriptor.kind {
                PropertyKind::Data { value, .. } => !value.to_boolean(),
                PropertyKind::Accessor { .. } => false,
            },
        }
    }

    /// The function behind this value, if any.
    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// The ordinary object behind this value, if any.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// SameValue comparison (`Object.is`).
    ///
    /// Differs from `===` in that `NaN` equals itself and `+0` differs
    /// from `-0`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b && a.is_sign_negative() == b.is_sign_negative()
                }
            }
            _ => self == other,
        }
    }

    /// Converts the value to a boolean (ToBoolean).
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_)
            | Value::Object(_)
            | Value::Array(_)
            | Value::Function(_)
            | Value::Exotic(_) => true,
        }
    }

    /// Returns the type of this value as a string.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // Historical quirk
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) | Value::Array(_) | Value::Exotic(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Converts the value to a string (ToString).
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Symbol(symbol) => symbol.to_string(),
            Value::Object(_) | Value::Exotic(_) => "[object Object]".to_string(),
            Value::Array(elements) => elements
                .borrow()
                .iter()
                .map(|element| {
                    if element.is_nullish() {
                        String::new()
                    } else {
                        element.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(func) => format!("function {}() {{ [native code] }}", func.name()),
        }
    }

    /// Converts the value to a number (ToNumber), for primitives.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }

    /// Converts the value into a property key (ToPropertyKey).
    pub fn to_property_key(&self) -> PropertyKey {
        match self {
            Value::Symbol(symbol) => PropertyKey::Symbol(symbol.clone()),
            other => PropertyKey::String(other.to_js_string()),
        }
    }

    /// Reads a property (`value[key]`), invoking accessors.
    pub fn get(&self, key: &PropertyKey) -> Result<Value> {
        match self {
            Value::Undefined | Value::Null => Err(Error::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                self.to_js_string(),
                key
            ))),
            Value::Object(object) => object::get(object, key, self),
            Value::Array(elements) => Ok(array_get(&elements.borrow(), key)),
            Value::Function(func) => Ok(match key.as_str() {
                Some("name") => Value::String(func.name().to_string()),
                Some("length") => Value::Number(func.arity() as f64),
                _ => Value::Undefined,
            }),
            Value::Exotic(exotic) => exotic.get(key, self),
            Value::String(s) => Ok(match key.as_str() {
                Some("length") => Value::Number(s.chars().count() as f64),
                Some(index) => index
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Undefined),
                None => Value::Undefined,
            }),
            Value::Boolean(_) | Value::Number(_) | Value::Symbol(_) => Ok(Value::Undefined),
        }
    }

    /// Writes a property (`value[key] = v`), invoking setters.
    ///
    /// Returns whether the write was accepted. A refused write is not an
    /// error; strict-mode callers decide whether to raise.
    pub fn set(&self, key: PropertyKey, value: Value) -> Result<bool> {
        match self {
            Value::Undefined | Value::Null => Err(Error::type_error(format!(
                "Cannot set properties of {} (setting '{}')",
                self.to_js_string(),
                key
            ))),
            Value::Object(object) => object::put(object, key, value, self),
            Value::Array(elements) => Ok(array_set(&mut elements.borrow_mut(), &key, value)),
            Value::Exotic(exotic) => exotic.set(key, value),
            _ => Ok(false),
        }
    }

    /// Own enumerable string keys, in own-key order (`Object.keys`).
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(object) => object.borrow().keys(),
            Value::Array(elements) => (0..elements.borrow().len()).map(|i| i.to_string()).collect(),
            Value::Exotic(exotic) => exotic.enumerable_keys(),
            _ => Vec::new(),
        }
    }

    /// Renders the value for display, similar to Node's `util.inspect`.
    pub fn inspect(&self) -> String {
        self.inspect_at(0)
    }

    fn inspect_at(&self, depth: usize) -> String {
        match self {
            Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            Value::Function(func) => {
                if func.name().is_empty() {
                    "[Function (anonymous)]".to_string()
                } else {
                    format!("[Function: {}]", func.name())
                }
            }
            Value::Array(elements) => {
                let elements = elements.borrow();
                if elements.is_empty() {
                    "[]".to_string()
                } else if depth > INSPECT_DEPTH {
                    "[Array]".to_string()
                } else {
                    let items: Vec<String> =
                        elements.iter().map(|e| e.inspect_at(depth + 1)).collect();
                    format!("[ {} ]", items.join(", "))
                }
            }
            Value::Object(object) => {
                let object = object.borrow();
                let prefix = match &object.kind {
                    ObjectKind::Ordinary => String::new(),
                    ObjectKind::Instance { constructor } => format!("{} ", constructor),
                };
                let entries: Vec<(PropertyKey, PropertyDescriptor)> = object
                    .own_keys()
                    .into_iter()
                    .filter_map(|key| {
                        let descriptor = object.get_own_property(&key)?.clone();
                        Some((key, descriptor))
                    })
                    .collect();
                drop(object);
                format!("{}{}", prefix, inspect_entries(&entries, depth, "[Object]"))
            }
            Value::Exotic(exotic) => {
                let entries: Vec<(PropertyKey, PropertyDescriptor)> = exotic
                    .own_keys()
                    .into_iter()
                    .filter_map(|key| {
                        let descriptor = exotic.get_own_property(&key)?;
                        Some((key, descriptor))
                    })
                    .collect();
                inspect_entries(&entries, depth, "[Object]")
            }
            other => other.to_js_string(),
        }
    }
}

fn inspect_entries(
    entries: &[(PropertyKey, PropertyDescriptor)],
    depth: usize,
    abbreviated: &str,
) -> String {
    let visible: Vec<&(PropertyKey, PropertyDescriptor)> =
        entries.iter().filter(|(_, d)| d.enumerable).collect();

    if visible.is_empty() {
        return "{}".to_string();
    }
    if depth > INSPECT_DEPTH {
        return abbreviated.to_string();
    }

    let items: Vec<String> = visible
        .into_iter()
        .map(|(key, descriptor)| {
            let rendered = match &descriptor.kind {
                PropertyKind::Data { value, .. } => value.inspect_at(depth + 1),
                PropertyKind::Accessor { get: Some(_), set: Some(_) } => "[Getter/Setter]".to_string(),
                PropertyKind::Accessor { get: Some(_), set: None } => "[Getter]".to_string(),
                PropertyKind::Accessor { get: None, .. } => "[Setter]".to_string(),
            };
            format!("{}: {}", inspect_key(key), rendered)
        })
        .collect();

    format!("{{ {} }}", items.join(", "))
}

fn inspect_key(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Symbol(symbol) => format!("[{}]", symbol),
        PropertyKey::String(name) => {
            let mut chars = name.chars();
            let is_identifier = chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
            if is_identifier {
                name.clone()
            } else {
                format!("'{}'", name)
            }
        }
    }
}

fn array_get(elements: &[Value], key: &PropertyKey) -> Value {
    match key.as_str() {
        Some("length") => Value::Number(elements.len() as f64),
        Some(index) => index
            .parse::<usize>()
            .ok()
            .and_then(|i| elements.get(i).cloned())
            .unwrap_or(Value::Undefined),
        None => Value::Undefined,
    }
}

fn array_set(elements: &mut Vec<Value>, key: &PropertyKey, value: Value) -> bool {
    let Some(index) = key.as_array_index() else {
        return false;
    };
    let index = index as usize;
    if index >= elements.len() {
        elements.resize(index + 1, Value::Undefined);
    }
    elements[index] = value;
    true
}

/// Formats a number the way JavaScript's `Number.prototype.toString` does
/// for the common cases.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        n.to_string()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_js_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::object(object)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(Rc::new(func))
    }
}

impl From<Rc<Function>> for Value {
    fn from(func: Rc<Function>) -> Self {
        Value::Function(func)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

/// A unique token usable as a property key.
///
/// Two symbols are equal only if they are the same symbol, regardless of
/// their descriptions.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

struct SymbolData {
    description: Option<String>,
}

impl Symbol {
    /// Creates a new, never-before-seen symbol.
    pub fn new(description: Option<String>) -> Self {
        Symbol(Rc::new(SymbolData { description }))
    }

    /// The description given at creation.
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality() {
        assert_eq!(Value::from(1), Value::Number(1.0));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_ne!(Value::from("1"), Value::from(1));
    }

    #[test]
    fn test_same_value() {
        assert!(Value::Number(f64::NAN).same_value(&Value::Number(f64::NAN)));
        assert!(!Value::Number(0.0).same_value(&Value::Number(-0.0)));
        assert!(Value::from("foo").same_value(&Value::from("foo")));

        let a = Value::object(Object::new());
        let b = Value::object(Object::new());
        assert!(a.same_value(&a.clone()));
        assert!(!a.same_value(&b));
    }

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = Symbol::new(Some("tag".into()));
        let b = Symbol::new(Some("tag".into()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "Symbol(tag)");
    }

    #[test]
    fn test_to_boolean() {
        assert!(!Value::Undefined.to_boolean());
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(!Value::from("").to_boolean());
        assert!(Value::from("0").to_boolean());
        assert!(Value::array(vec![]).to_boolean());
    }

    #[test]
    fn test_to_js_string() {
        assert_eq!(Value::from(42).to_js_string(), "42");
        assert_eq!(Value::Number(1.5).to_js_string(), "1.5");
        assert_eq!(Value::Number(-0.0).to_js_string(), "0");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_js_string(), "-Infinity");
        assert_eq!(
            Value::array(vec![Value::from(1), Value::Null, Value::from("a")]).to_js_string(),
            "1,,a"
        );
    }

    #[test]
    fn test_get_on_nullish_is_type_error() {
        let err = Value::Undefined.get(&"foo".into()).unwrap_err();
        assert_eq!(
            err,
            Error::type_error("Cannot read properties of undefined (reading 'foo')")
        );
    }

    #[test]
    fn test_function_name_and_length() {
        let func = Value::from(Function::native("bar", 2, |_, _| Ok(Value::Undefined)));
        assert_eq!(func.get(&"name".into()).unwrap(), Value::from("bar"));
        assert_eq!(func.get(&"length".into()).unwrap(), Value::from(2));
    }

    #[test]
    fn test_plain_object_detection() {
        assert!(Value::object(Object::new()).is_plain_object());
        assert!(!Value::object(Object::instance("Date")).is_plain_object());
        assert!(!Value::array(vec![]).is_plain_object());
        assert!(!Value::Null.is_plain_object());

        let mut tagged = Object::new();
        let foo = Function::native("Foo", 0, |_, _| Ok(Value::Undefined));
        tagged.set("constructor".into(), Value::from(foo));
        assert!(!Value::object(tagged).is_plain_object());

        let mut cleared = Object::new();
        cleared.set("constructor".into(), Value::Null);
        assert!(Value::object(cleared).is_plain_object());
    }

    #[test]
    fn test_inspect() {
        let mut object = Object::new();
        object.set("foo".into(), Value::from(1));
        object.set("bar-baz".into(), Value::from("x"));
        object.set(
            "fn".into(),
            Value::from(Function::native("fn", 0, |_, _| Ok(Value::Undefined))),
        );
        object.set("list".into(), Value::array(vec![Value::from(true)]));

        assert_eq!(
            Value::object(object).inspect(),
            "{ foo: 1, 'bar-baz': 'x', fn: [Function: fn], list: [ true ] }"
        );
        assert_eq!(Value::object(Object::new()).inspect(), "{}");
        assert_eq!(Value::object(Object::instance("Date")).inspect(), "Date {}");
    }
}
