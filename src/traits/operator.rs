use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::engine::NodeContext;

/// Payload flowing between nodes.
///
/// The runtime never inspects payloads; it only clones them for fan-out.
pub type Message = serde_json::Value;

/// A running operator: the logic shared by every worker of one node.
///
/// `run` is invoked once per worker with that worker's own cancellation token.
/// Implementations must return promptly once the token fires. Returning, with
/// or without an error, ends only the calling worker.
#[async_trait]
pub trait Operator: Send + Sync {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()>;
}

/// Constructs operator instances for one operator type.
pub trait OperatorFactory: Send + Sync {
    /// Operator type name referenced by the `module` field of a node.
    fn name(&self) -> &str;

    /// Build the instance for node `instance_name` from its opaque configuration.
    fn create(
        &self,
        instance_name: &str,
        config: &serde_yaml::Value,
    ) -> anyhow::Result<Arc<dyn Operator>>;
}
