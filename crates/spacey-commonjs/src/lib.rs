// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-commonjs
//!
//! CommonJS `module`, `exports` and `require` bindings for scripts that run
//! outside a CommonJS host.
//!
//! Every assignment to `exports` (or `module.exports`) is collected into an
//! ordered dictionary. Names never collide: writing a different value to a
//! name that is already taken stores it under `name_1`, `name_2`, ... while
//! writing the same value again is a no-op.
//!
//! - [`Exports`] - the intercepting exports object
//! - [`Module`] - `module.exports`, `module.exported` and `module.require`
//! - [`NameAllocator`] - the collision-free naming rule
//! - [`Environment`] - one isolated set of bindings
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_commonjs::Environment;
//! use spacey_value::Value;
//!
//! let env = Environment::new();
//! env.exports().assign("foo", Value::from(1));
//! env.exports().assign("foo", Value::from(2));
//! env.exports().assign("foo", Value::from(1));
//!
//! let exported = env.module().exported().unwrap();
//! assert_eq!(Value::from(exported).inspect(), "{ foo: 1, foo_1: 2 }");
//! ```
//!
//! ## Require
//!
//! `require` fails until a resolver is supplied:
//!
//! ```rust
//! use spacey_commonjs::{Environment, Options};
//! use spacey_value::Value;
//!
//! let env = Environment::with_options(
//!     Options::new().require(|id| Ok(Value::from(format!("<{}>", id)))),
//! );
//! assert_eq!(env.resolve("fs").unwrap(), Value::from("<fs>"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod environment;
pub mod error;
pub mod exports;
pub mod module;
pub mod names;
pub mod require;

pub use collection::ExportCollection;
pub use environment::{Environment, Options};
pub use error::{CommonJsError, Result};
pub use exports::{Assignment, Exports};
pub use module::Module;
pub use names::{Allocation, NameAllocator};
pub use require::{RequireSlot, Resolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
