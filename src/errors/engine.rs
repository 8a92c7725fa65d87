// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{BuildError, ConfigError};

/// Errors returned by the engine entry points.
///
/// Configuration and build failures abort `run` before any worker is spawned.
/// Failures inside a running operator never surface here; they are logged
/// against the node that produced them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine is already running")]
    AlreadyRunning,

    #[error("Engine must be started from within a Tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Graph build failed: {0}")]
    Build(#[from] BuildError),
}
