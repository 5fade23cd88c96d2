// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! JavaScript function representation.

use crate::error::Result;
use crate::value::Value;

/// The behaviour of a function: receives `this` and the arguments.
pub type NativeFunction = dyn Fn(&Value, &[Value]) -> Result<Value>;

/// A callable value.
///
/// Both host (Rust) functions and script closures are represented as a
/// boxed behaviour; identity is the `Rc` allocation holding the function.
pub struct Function {
    /// The function name ("" when anonymous)
    name: String,
    /// The declared number of parameters
    arity: usize,
    /// What the function does when called
    behavior: Box<NativeFunction>,
}

impl Function {
    /// Creates a function.
    pub fn native(
        name: impl Into<String>,
        arity: usize,
        behavior: impl Fn(&Value, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            behavior: Box::new(behavior),
        }
    }

    /// Creates an anonymous function.
    pub fn anonymous(
        arity: usize,
        behavior: impl Fn(&Value, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self::native("", arity, behavior)
    }

    /// The function name; empty for anonymous functions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arity (number of parameters).
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Calls the function.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        (self.behavior)(this, args)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "Function(anonymous)")
        } else {
            write!(f, "Function({})", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_call_passes_this_and_args() {
        let func = Function::native("pick", 2, |this, args| {
            if this.is_undefined() {
                Ok(args.get(1).cloned().unwrap_or_default())
            } else {
                Ok(this.clone())
            }
        });

        assert_eq!(func.name(), "pick");
        assert_eq!(func.arity(), 2);
        assert_eq!(
            func.call(&Value::Undefined, &[Value::from(1), Value::from(2)]).unwrap(),
            Value::from(2)
        );
        assert_eq!(func.call(&Value::from("self"), &[]).unwrap(), Value::from("self"));
    }

    #[test]
    fn test_anonymous_function_has_empty_name() {
        let func = Function::anonymous(0, |_, _| Err(Error::error("nope")));
        assert_eq!(func.name(), "");
        assert_eq!(format!("{:?}", func), "Function(anonymous)");
        assert!(func.call(&Value::Undefined, &[]).is_err());
    }
}
