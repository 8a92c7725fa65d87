// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! This module provides centralized message types for the diagnostic and
//! operational logging of the stream engine. Message types follow a
//! struct-based pattern with a `Display` implementation, so log text lives
//! in one place instead of being scattered through the runtime as format
//! strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - engine lifecycle and graph materialization
//! * `messages::node` - per-node worker lifecycle and delivery events
//! * `messages::validation` - graph validation outcomes
//!
//! # Usage
//!
//! ```rust
//! use the_dagstream::observability::messages::node::BackpressureDetected;
//! use the_dagstream::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! let msg = BackpressureDetected {
//!     from: "source/sequence[numbers]",
//!     to: "transform/multiply[double]",
//!     elapsed: Duration::from_millis(350),
//! };
//!
//! msg.log();
//! ```

pub mod messages;
