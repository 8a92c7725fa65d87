// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod build;
mod config;
mod engine;
mod registry;

pub use build::BuildError;
pub use config::{ConfigError, LoadError, ValidationError};
pub use engine::EngineError;
pub use registry::RegistryError;
