// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-value
//!
//! The JavaScript value model used by the Spacey CommonJS shim.
//!
//! This crate provides:
//! - [`Value`] - primitives plus reference values compared by identity
//! - [`Object`] - ordinary objects with insertion-ordered properties
//! - [`Function`] - callable values backed by Rust closures
//! - [`ExoticObject`] - the trap surface for proxy-like objects
//! - [`Error`] - the engine error type
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_value::{Object, Value};
//!
//! let mut object = Object::new();
//! object.set("answer".into(), Value::from(42));
//! let value = Value::object(object);
//!
//! assert_eq!(value.get(&"answer".into()).unwrap(), Value::from(42));
//! assert_eq!(value.inspect(), "{ answer: 42 }");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod exotic;
pub mod function;
pub mod object;
pub mod property;
pub mod value;

pub use error::{Error, Result};
pub use exotic::ExoticObject;
pub use function::Function;
pub use object::{ArrayRef, Object, ObjectKind, ObjectRef};
pub use property::{PropertyDescriptor, PropertyKey, PropertyKind};
pub use value::{Symbol, Value};
