// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operator backends for the stream engine.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process operators registered by
//! [`register_builtin_operators`](local::register_builtin_operators):
//! - **Sources**: `source/sequence` (bounded integer range), `timer/interval` (periodic tick), `timer/cronjob` (crontab-scheduled tags)
//! - **Transforms**: `transform/multiply`
//! - **Sinks**: `sink/printer`, `sink/blackhole`
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities for runtime development (only available in test builds):
//! - **ScriptedSource**: Emits a fixed list of messages
//! - **RecordingSink**: Records what it receives, optionally gated by a semaphore
//! - **FailingOperator**: Workers fail immediately
//! - **StubFactory**: Hands out a prebuilt instance and counts invocations
//!
//! # Architecture
//!
//! ```text
//! Graph document → Registry → Factory → Operator instance → Node workers
//! ```
//!
//! # Examples
//!
//! ```rust
//! use the_dagstream::backends::local::LocalOperatorFactory;
//! use the_dagstream::traits::OperatorFactory;
//!
//! let factory = LocalOperatorFactory::for_type("transform/multiply").unwrap();
//! let config: serde_yaml::Value = serde_yaml::from_str("factor: 2").unwrap();
//! let operator = factory.create("double", &config)?;
//! # let _ = operator;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
