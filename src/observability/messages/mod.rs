// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable text and
//! [`StructuredLog`] to emit itself through `tracing` at its own level, with
//! its fields attached as structured key/values.
//!
//! # Organization
//!
//! * `engine` - engine lifecycle and graph materialization
//! * `node` - worker lifecycle, failures and backpressure
//! * `validation` - graph validation outcomes
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_dagstream::observability::messages::engine::EngineStarted;
//! use the_dagstream::observability::messages::StructuredLog;
//!
//! let msg = EngineStarted {
//!     node_count: 4,
//!     root_count: 1,
//! };
//!
//! tracing::info!("{}", msg);
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod node;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Open a span carrying the message fields.
    fn span(&self, name: &str) -> Span;
}
