// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Console built-in object.
//!
//! Provides `console.log`, `console.info`, `console.warn` and `console.error`.

use spacey_value::{Result, Value};

/// console.log - prints to stdout
pub fn console_log(_this: &Value, args: &[Value]) -> Result<Value> {
    println!("{}", format_log_args(args));
    Ok(Value::Undefined)
}

/// console.error - prints to stderr
pub fn console_error(_this: &Value, args: &[Value]) -> Result<Value> {
    eprintln!("{}", format_log_args(args));
    Ok(Value::Undefined)
}

/// Joins log arguments with spaces: strings verbatim, everything else
/// inspected.
pub fn format_log_args(args: &[Value]) -> String {
    args.iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.inspect(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
