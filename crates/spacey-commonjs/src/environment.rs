// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Environment factory.
//!
//! An [`Environment`] bundles one exports object, one `module` object and one
//! `require` function. Environments share nothing with each other.

use crate::error::Result;
use crate::exports::Exports;
use crate::module::Module;
use crate::require::{not_implemented, RequireSlot, Resolver};
use spacey_value::{object, Function, ObjectRef, PropertyKey, Value};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Environment configuration
#[derive(Clone, Default)]
pub struct Options {
    require: Option<Resolver>,
}

impl Options {
    /// Default options: `require` fails for every module id
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `resolver` as the initial `require` implementation
    pub fn require(mut self, resolver: impl Fn(&str) -> Result<Value> + 'static) -> Self {
        self.require = Some(Rc::new(resolver));
        self
    }

    /// Use an existing shared resolver
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.require = Some(resolver);
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("require", &self.require.is_some())
            .finish()
    }
}

/// The `module`, `exports` and `require` bindings for one script
#[derive(Debug, Clone)]
pub struct Environment {
    module: Module,
    exports: Exports,
    require: Rc<Function>,
    slot: Rc<RequireSlot>,
}

impl Environment {
    /// Create an environment with default options
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create an environment
    pub fn with_options(options: Options) -> Self {
        let slot = Rc::new(RequireSlot::new(
            options.require.unwrap_or_else(not_implemented),
        ));
        let exports = Exports::new();
        let module = Module::new(exports.clone(), Rc::clone(&slot));
        let require = module.require();

        Self {
            module,
            exports,
            require,
            slot,
        }
    }

    /// The `module` object
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The `exports` object
    pub fn exports(&self) -> &Exports {
        &self.exports
    }

    /// The top-level `require` function; the same function as
    /// `module.require`
    pub fn require(&self) -> &Rc<Function> {
        &self.require
    }

    /// Call the active resolver directly
    pub fn resolve(&self, id: &str) -> Result<Value> {
        self.slot.resolve(id)
    }

    /// Install `module`, `exports` and `require` into a global object.
    ///
    /// Each binding is only written when the global's current value is
    /// falsy, so a host that already provides CommonJS keeps its own.
    /// Returns the names that were installed.
    pub fn install(&self, globals: &ObjectRef) -> Result<Vec<&'static str>> {
        let receiver = Value::Object(Rc::clone(globals));
        let bindings = [
            ("module", self.module.to_value()),
            ("exports", self.exports.to_value()),
            ("require", Value::Function(Rc::clone(&self.require))),
        ];

        let mut installed = Vec::new();
        for (name, value) in bindings {
            let key = PropertyKey::from(name);
            let current = object::get(globals, &key, &receiver)?;

            if current.to_boolean() {
                trace!("global {} already defined, keeping it", name);
                continue;
            }

            object::put(globals, key, value, &receiver)?;
            installed.push(name);
        }

        debug!("installed CommonJS globals: {:?}", installed);
        Ok(installed)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommonJsError;
    use spacey_value::Object;
    use std::cell::RefCell;

    fn globals() -> ObjectRef {
        Rc::new(RefCell::new(Object::new()))
    }

    #[test]
    fn test_default_require_fails() {
        let env = Environment::new();
        assert_eq!(env.resolve("fs"), Err(CommonJsError::not_implemented("fs")));
    }

    #[test]
    fn test_options_seed_the_resolver() {
        let env = Environment::with_options(Options::new().require(|id| Ok(Value::from(id))));
        assert_eq!(
            env.require().call(&Value::Undefined, &[Value::from("path")]).unwrap(),
            Value::from("path")
        );
    }

    #[test]
    fn test_require_is_module_require() {
        let env = Environment::new();
        assert!(Rc::ptr_eq(env.require(), &env.module().require()));
    }

    #[test]
    fn test_environments_are_isolated() {
        let a = Environment::new();
        let b = Environment::new();

        a.exports().assign("foo", Value::from(1));
        a.module().set_require(|_| Ok(Value::Null));

        assert!(b.exports().is_empty());
        assert!(b.resolve("x").is_err());
        assert!(!a.exports().ptr_eq(b.exports()));
    }

    #[test]
    fn test_module_exports_is_the_exports_object() {
        let env = Environment::new();
        assert!(env.module().exports().ptr_eq(env.exports()));
    }

    #[test]
    fn test_install_into_empty_globals() {
        let env = Environment::new();
        let globals = globals();

        let installed = env.install(&globals).unwrap();
        assert_eq!(installed, vec!["module", "exports", "require"]);

        let globals = globals.borrow();
        assert_eq!(globals.get(&"module".into()), Some(env.module().to_value()));
        assert!(env.exports().is(&globals.get(&"exports".into()).unwrap()));
    }

    #[test]
    fn test_install_keeps_existing_bindings() {
        let env = Environment::new();
        let globals = globals();
        let existing = Value::object(Object::new());
        globals.borrow_mut().set("module".into(), existing.clone());
        globals.borrow_mut().set("exports".into(), Value::Null);

        let installed = env.install(&globals).unwrap();
        assert_eq!(installed, vec!["exports", "require"]);
        assert_eq!(globals.borrow().get(&"module".into()), Some(existing));
    }

    #[test]
    fn test_install_twice_is_harmless() {
        let env = Environment::new();
        let globals = globals();

        env.install(&globals).unwrap();
        assert!(env.install(&globals).unwrap().is_empty());
    }
}
