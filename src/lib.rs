// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // builtin operators
pub mod config;     // graph documents, validation, registry
pub mod engine;     // runtime nodes, telemetry, engine lifecycle
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // operator and logger abstractions
