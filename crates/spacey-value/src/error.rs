// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Errors raised while evaluating or calling into JavaScript values.

use thiserror::Error;

/// Result type for value operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during JavaScript execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Generic `Error` (thrown by host functions)
    #[error("Error: {0}")]
    Error(String),

    /// Syntax error during parsing
    #[error("SyntaxError: {0}")]
    SyntaxError(String),

    /// Type error during execution
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Reference error (undefined variable)
    #[error("ReferenceError: {0}")]
    ReferenceError(String),

    /// Range error (out of bounds, etc.)
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Internal engine error
    #[error("InternalError: {0}")]
    InternalError(String),

    /// I/O error
    #[error("IOError: {0}")]
    Io(String),
}

impl Error {
    /// Create a generic error
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Create a new TypeError
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a new ReferenceError
    pub fn reference_error(msg: impl Into<String>) -> Self {
        Self::ReferenceError(msg.into())
    }

    /// Create a new SyntaxError
    pub fn syntax_error(msg: impl Into<String>) -> Self {
        Self::SyntaxError(msg.into())
    }

    /// The message without the error kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Error(msg)
            | Error::SyntaxError(msg)
            | Error::TypeError(msg)
            | Error::ReferenceError(msg)
            | Error::RangeError(msg)
            | Error::InternalError(msg)
            | Error::Io(msg) => msg,
        }
    }
}
