use std::fmt;

use crate::engine::NodeContext;
use crate::observability::messages::node::{ModuleStarted, ModuleStopped};
use crate::observability::messages::StructuredLog;

/// Logging surface handed to operators through their node context.
///
/// Every call is scoped to the node that emits it, so implementations can tag
/// records with the node identity without operators repeating it.
pub trait NodeLogger: Send + Sync {
    /// The node launched its workers.
    fn module_started(&self, node: &NodeContext);

    /// The last worker of the node returned.
    fn module_stopped(&self, node: &NodeContext);

    fn info(&self, node: &NodeContext, message: fmt::Arguments<'_>);
    fn warn(&self, node: &NodeContext, message: fmt::Arguments<'_>);
    fn error(&self, node: &NodeContext, message: fmt::Arguments<'_>);
    fn trace(&self, node: &NodeContext, message: fmt::Arguments<'_>);
}

/// Default logger forwarding to `tracing` with a `module` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl NodeLogger for TracingLogger {
    fn module_started(&self, node: &NodeContext) {
        ModuleStarted {
            node: &node.key().to_string(),
            parallels: node.parallels(),
        }
        .log();
    }

    fn module_stopped(&self, node: &NodeContext) {
        ModuleStopped {
            node: &node.key().to_string(),
            received: node.received(),
            sent: node.sent(),
        }
        .log();
    }

    fn info(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        tracing::info!(module = %node.key(), "{}", message);
    }

    fn warn(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        tracing::warn!(module = %node.key(), "{}", message);
    }

    fn error(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        tracing::error!(module = %node.key(), "{}", message);
    }

    fn trace(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        tracing::trace!(module = %node.key(), "{}", message);
    }
}
