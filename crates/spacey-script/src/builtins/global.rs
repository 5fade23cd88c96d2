// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Global functions and value properties.

use spacey_value::{PropertyDescriptor, PropertyKind, Result, Symbol, Value};

/// Symbol([description])
pub fn symbol(_this: &Value, args: &[Value]) -> Result<Value> {
    let description = match args.first() {
        None | Some(Value::Undefined) => None,
        Some(value) => Some(value.to_js_string()),
    };
    Ok(Value::Symbol(Symbol::new(description)))
}

/// `undefined`, `NaN` and `Infinity`: read-only, hidden and permanent.
pub fn constants() -> [(&'static str, PropertyDescriptor); 3] {
    let constant = |value: Value| PropertyDescriptor {
        kind: PropertyKind::Data {
            value,
            writable: false,
        },
        enumerable: false,
        configurable: false,
    };

    [
        ("undefined", constant(Value::Undefined)),
        ("NaN", constant(Value::Number(f64::NAN))),
        ("Infinity", constant(Value::Number(f64::INFINITY))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_description() {
        let Value::Symbol(symbol) = symbol(&Value::Undefined, &[Value::from("tag")]).unwrap() else {
            panic!("expected a symbol");
        };
        assert_eq!(symbol.description(), Some("tag"));
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = symbol(&Value::Undefined, &[]).unwrap();
        let b = symbol(&Value::Undefined, &[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.type_of(), "symbol");
    }

    #[test]
    fn test_constants_are_read_only() {
        for (_, descriptor) in constants() {
            assert!(matches!(descriptor.kind, PropertyKind::Data { writable: false, .. }));
            assert!(!descriptor.configurable);
        }
    }
}
