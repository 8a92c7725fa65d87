// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod builder;
mod lifecycle;
pub mod node;
pub mod snapshot;
pub mod telemetry;

pub use lifecycle::Engine;
pub use node::{MessageQueue, NodeContext, NodeKey, Topology};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
pub use telemetry::{QpsSamples, QpsWindow, Telemetry};
