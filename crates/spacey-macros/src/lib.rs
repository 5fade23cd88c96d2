//! Developer-friendly macros for the Spacey CommonJS shim.
//!
//! # Macros Overview
//!
//! ## Values
//! - [`js_object!`] - Create an ordinary object `Value`
//! - [`js_array!`] - Create an array `Value`
//! - [`js_function!`] - Create a native function `Value`
//!
//! ## Lexing
//! - [`js_keywords!`] - Define a keyword lookup table
//! - [`is_id_start!`] / [`is_id_continue!`] - Identifier character classes
//!
//! ## Testing
//! - [`assert_ok!`] / [`assert_err!`] - Unwrap a `Result` or panic
//! - [`assert_matches!`] - Pattern assertions
//! - [`assert_same_value!`] - `Object.is` assertions
//!
//! # Examples
//!
//! ```
//! use spacey_macros::*;
//!
//! let exports = js_object! {
//!     "foo" => 1,
//!     "bar" => js_array![true, "baz"],
//! };
//! assert_eq!(exports.inspect(), "{ foo: 1, bar: [ true, 'baz' ] }");
//! ```

#![warn(missing_docs)]

mod js;
mod testing;
