// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors returned by the operator registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A factory with the same operator type name is already registered
    #[error("Operator '{name}' is already registered")]
    DuplicateOperator { name: String },

    /// No factory is registered under the requested operator type name
    #[error("Operator '{name}' is not registered")]
    UnknownOperator { name: String },
}
