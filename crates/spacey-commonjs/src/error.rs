// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the CommonJS shim

use thiserror::Error;

/// Result type for CommonJS shim operations
pub type Result<T> = std::result::Result<T, CommonJsError>;

/// Errors that can occur in the CommonJS shim
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonJsError {
    /// The default `require` was called; no resolver has been installed
    #[error("Can't require {id}: require is not implemented")]
    NotImplemented {
        /// The requested module identifier
        id: String,
    },

    /// Error raised by script code (a resolver, a getter)
    #[error(transparent)]
    Engine(#[from] spacey_value::Error),
}

impl CommonJsError {
    /// Create a "require is not implemented" error
    pub fn not_implemented(id: impl Into<String>) -> Self {
        Self::NotImplemented { id: id.into() }
    }
}

impl From<CommonJsError> for spacey_value::Error {
    fn from(err: CommonJsError) -> Self {
        match err {
            CommonJsError::Engine(inner) => inner,
            other => spacey_value::Error::error(other.to_string()),
        }
    }
}
