// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-script
//!
//! A small JavaScript interpreter that runs CommonJS-style scripts against a
//! [`spacey_commonjs::Environment`].
//!
//! ## Overview
//!
//! - Lexer and recursive descent parser for a practical subset of
//!   JavaScript (declarations, functions, arrows, objects, arrays, member
//!   access, calls, `=` and `||=`)
//! - Tree-walking interpreter with block scoping and closures
//! - Built-ins: `Object.*`, `Symbol`, `console`, `globalThis`
//!
//! The top-level `this` of a script is `module.exports`, as in Node.
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_script::Engine;
//! use spacey_value::Value;
//!
//! let mut engine = Engine::new();
//! engine.eval("exports.answer = 42").unwrap();
//!
//! let exported = engine.eval("module.exported").unwrap();
//! assert_eq!(exported.get(&"answer".into()).unwrap(), Value::from(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod builtins;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use interpreter::Interpreter;
pub use parser::Parser;

use spacey_commonjs::Environment;
use spacey_value::{Error, Object, ObjectRef, Value};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

/// A script engine hosting one CommonJS environment.
///
/// Encapsulates the global object, the interpreter state and the
/// environment whose `module`, `exports` and `require` the scripts see.
pub struct Engine {
    interpreter: Interpreter,
    environment: Environment,
}

impl Engine {
    /// Creates an engine with a fresh environment.
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    /// Creates an engine hosting `environment`.
    ///
    /// The environment is installed into a new global object next to the
    /// built-ins.
    pub fn with_environment(environment: Environment) -> Self {
        let global: ObjectRef = Rc::new(RefCell::new(Object::new()));
        builtins::register_builtins(&global);

        match environment.install(&global) {
            Ok(installed) => debug!("engine globals: {:?}", installed),
            Err(err) => warn!("failed to install CommonJS globals: {}", err),
        }

        let this = environment.exports().to_value();
        Self {
            interpreter: Interpreter::with_this(global, this),
            environment,
        }
    }

    /// Evaluates source code and returns the completion value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use spacey_script::Engine;
    /// use spacey_value::Value;
    ///
    /// let mut engine = Engine::new();
    /// assert_eq!(engine.eval("typeof require").unwrap(), Value::from("function"));
    /// ```
    pub fn eval(&mut self, source: &str) -> Result<Value, Error> {
        self.interpreter.eval(source)
    }

    /// Evaluates source code from a file.
    pub fn eval_file(&mut self, path: &Path) -> Result<Value, Error> {
        debug!("evaluating {}", path.display());
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        self.eval(&source)
    }

    /// The hosted environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The global object.
    pub fn global(&self) -> &ObjectRef {
        self.interpreter.global()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
