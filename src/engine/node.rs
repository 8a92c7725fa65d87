// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime nodes and the context handed to operator code.
//!
//! A materialized graph is a [`Topology`]: an arena of [`RuntimeNode`]s
//! addressed by index, with downstream edges stored as indices. Operators never
//! see the arena; each worker receives a [`NodeContext`] exposing only its own
//! node: name, logger, input queue, `collect` and its factory/instance.
//!
//! ## Delivery
//!
//! `collect` broadcasts to every downstream node sequentially, in configured
//! order, awaiting each bounded push before moving to the next. A full queue
//! therefore stalls the sender and every later downstream behind it. This is
//! the only backpressure mechanism: nothing is dropped and no queue grows past
//! its capacity.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

use crate::config::consts::QPS_SAMPLE_PERIOD;
use crate::engine::telemetry::{QpsSamples, Telemetry};
use crate::observability::messages::node::{BackpressureDetected, ModuleStarted, WorkerFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{Message, NodeLogger, Operator, OperatorFactory};

/// Index of a node inside its topology.
pub type NodeId = usize;

/// Identity of a runtime node: operator type plus node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub operator: String,
    pub name: String,
}

impl NodeKey {
    pub fn new(operator: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.operator, self.name)
    }
}

/// Bounded input queue of a node.
///
/// Written by upstream senders, read by the node's own workers. The read side
/// is shared: each message reaches exactly one of the node's workers.
pub struct MessageQueue {
    sender: mpsc::Sender<Message>,
    receiver: Mutex<mpsc::Receiver<Message>>,
    capacity: usize,
}

impl MessageQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Mutex::new(receiver),
            capacity,
        }
    }

    /// Wait for the next message.
    ///
    /// Cancel-safe: dropping the future before it completes loses no message,
    /// so it can be raced against a cancellation token in `tokio::select!`.
    pub async fn recv(&self) -> Option<Message> {
        self.receiver.lock().await.recv().await
    }

    /// Take a message if one is ready and no other worker is reading.
    pub fn try_recv(&self) -> Option<Message> {
        self.receiver.try_lock().ok()?.try_recv().ok()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Messages currently buffered.
    pub fn len(&self) -> usize {
        self.capacity.saturating_sub(self.sender.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocking push; waits while the queue is full.
    ///
    /// The queue owns its receiver, so the channel cannot close while `self`
    /// is alive and the send never fails.
    pub(crate) async fn push(&self, message: Message) {
        let _ = self.sender.send(message).await;
    }
}

impl fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

/// Runtime state of one materialized node.
pub(crate) struct RuntimeNode {
    pub(crate) key: NodeKey,
    pub(crate) parallels: usize,
    pub(crate) factory: Arc<dyn OperatorFactory>,
    pub(crate) instance: Arc<dyn Operator>,
    pub(crate) queue: MessageQueue,
    pub(crate) downstream: Vec<NodeId>,
    /// Scope of the root whose traversal discovered this node.
    pub(crate) scope: CancellationToken,
    pub(crate) started: AtomicBool,
    pub(crate) active_workers: AtomicUsize,
    pub(crate) telemetry: Telemetry,
}

impl RuntimeNode {
    pub(crate) fn new(
        key: NodeKey,
        parallels: usize,
        queue_size: usize,
        factory: Arc<dyn OperatorFactory>,
        instance: Arc<dyn Operator>,
        scope: CancellationToken,
        qps_window_capacity: usize,
    ) -> Self {
        Self {
            key,
            parallels: parallels.max(1),
            factory,
            instance,
            queue: MessageQueue::new(queue_size),
            downstream: Vec::new(),
            scope,
            started: AtomicBool::new(false),
            active_workers: AtomicUsize::new(0),
            telemetry: Telemetry::new(qps_window_capacity),
        }
    }
}

/// Engine-wide settings shared by every node of a topology.
#[derive(Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) slow_threshold: Option<Duration>,
    pub(crate) sample_period: Duration,
    pub(crate) logger: Arc<dyn NodeLogger>,
}

impl RuntimeSettings {
    pub(crate) fn new(slow_threshold: Option<Duration>, logger: Arc<dyn NodeLogger>) -> Self {
        Self {
            slow_threshold,
            sample_period: QPS_SAMPLE_PERIOD,
            logger,
        }
    }
}

/// A materialized forest of runtime nodes.
pub struct Topology {
    pub(crate) nodes: Vec<RuntimeNode>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) settings: RuntimeSettings,
    pub(crate) tracker: TaskTracker,
}

impl Topology {
    pub(crate) fn new(nodes: Vec<RuntimeNode>, roots: Vec<NodeId>, settings: RuntimeSettings) -> Self {
        Self {
            nodes,
            roots,
            settings,
            tracker: TaskTracker::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Context handle for the node named `name`, if materialized.
    pub fn context(self: &Arc<Self>, name: &str) -> Option<NodeContext> {
        self.nodes
            .iter()
            .position(|node| node.key.name == name)
            .map(|id| NodeContext {
                topology: Arc::clone(self),
                id,
            })
    }

    /// Total number of workers still running across the topology.
    pub fn active_workers(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.active_workers.load(Ordering::Acquire))
            .sum()
    }

    /// Start every root and, transitively, everything downstream of it.
    pub(crate) fn start(self: &Arc<Self>, handle: &Handle) {
        for &root in &self.roots {
            self.start_node(root, handle);
        }
        self.tracker.close();
    }

    /// Launch the sampler and workers of one node, then recurse downstream.
    ///
    /// A node reachable from several parents starts once.
    fn start_node(self: &Arc<Self>, id: NodeId, handle: &Handle) {
        let node = &self.nodes[id];
        if node.started.swap(true, Ordering::AcqRel) {
            return;
        }

        let sampler = NodeContext {
            topology: Arc::clone(self),
            id,
        };
        self.tracker.spawn_on(
            async move {
                let node = sampler.node();
                node.telemetry
                    .sample_until_cancelled(node.scope.clone(), sampler.topology.settings.sample_period)
                    .await;
            },
            handle,
        );

        let ctx = NodeContext {
            topology: Arc::clone(self),
            id,
        };
        node.active_workers.store(node.parallels, Ordering::Release);
        self.settings.logger.module_started(&ctx);

        let label = node.key.to_string();
        for worker in 0..node.parallels {
            let cancel = node.scope.child_token();
            let instance = Arc::clone(&node.instance);
            let guard = WorkerGuard { ctx: ctx.clone() };
            let span = ModuleStarted {
                node: &label,
                parallels: node.parallels,
            }
            .span("worker");
            span.record("worker", worker);
            self.tracker.spawn_on(
                async move {
                    let ctx = guard.ctx.clone();
                    if let Err(error) = instance.run(cancel, ctx.clone()).await {
                        let node = ctx.key().to_string();
                        ctx.logger().error(
                            &ctx,
                            format_args!(
                                "{}",
                                WorkerFailed {
                                    node: &node,
                                    worker,
                                    error: &error,
                                }
                            ),
                        );
                    }
                    drop(guard);
                }
                .instrument(span),
                handle,
            );
        }

        for &child in &node.downstream {
            self.start_node(child, handle);
        }
    }

    /// Cancel every root scope, and with it every derived worker scope.
    pub(crate) fn cancel_roots(&self) {
        for &root in &self.roots {
            self.nodes[root].scope.cancel();
        }
    }

    /// Wait until every worker and sampler spawned by `start` has returned.
    pub(crate) async fn drained(&self) {
        self.tracker.wait().await;
    }
}

impl fmt::Debug for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topology")
            .field("nodes", &self.nodes.iter().map(|n| n.key.to_string()).collect::<Vec<_>>())
            .field("roots", &self.roots)
            .finish()
    }
}

/// Decrements the node's worker count when a worker exits, panics included.
struct WorkerGuard {
    ctx: NodeContext,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let remaining = self.ctx.node().active_workers.fetch_sub(1, Ordering::AcqRel);
        if remaining == 1 {
            self.ctx.logger().module_stopped(&self.ctx);
        }
    }
}

/// Handle given to operator code for one node.
///
/// Cheap to clone; every worker of a node gets its own copy.
#[derive(Clone)]
pub struct NodeContext {
    topology: Arc<Topology>,
    id: NodeId,
}

impl NodeContext {
    fn node(&self) -> &RuntimeNode {
        &self.topology.nodes[self.id]
    }

    /// Node name as declared in the graph document.
    pub fn name(&self) -> &str {
        &self.node().key.name
    }

    pub fn key(&self) -> &NodeKey {
        &self.node().key
    }

    pub fn parallels(&self) -> usize {
        self.node().parallels
    }

    pub fn logger(&self) -> &dyn NodeLogger {
        self.topology.settings.logger.as_ref()
    }

    /// Read side of this node's input queue.
    pub fn message_queue(&self) -> &MessageQueue {
        &self.node().queue
    }

    /// Factory that built this node's operator.
    pub fn factory(&self) -> &Arc<dyn OperatorFactory> {
        &self.node().factory
    }

    /// The operator instance shared by this node's workers.
    pub fn instance(&self) -> &Arc<dyn Operator> {
        &self.node().instance
    }

    /// Messages pushed into this node's queue so far.
    pub fn received(&self) -> u64 {
        self.node().telemetry.received()
    }

    /// Completed `collect` calls so far.
    pub fn sent(&self) -> u64 {
        self.node().telemetry.sent()
    }

    pub fn qps(&self) -> QpsSamples {
        self.node().telemetry.qps()
    }

    /// Workers of this node still running.
    pub fn active_workers(&self) -> usize {
        self.node().active_workers.load(Ordering::Acquire)
    }

    /// Broadcast `value` to every downstream node, in configured order.
    ///
    /// Each push waits while the target queue is full. Pushes slower than the
    /// engine's slow threshold are reported through the logger. The future
    /// does not observe cancellation; operators that must stop while blocked
    /// should race it against their token.
    pub async fn collect(&self, value: Message) {
        let node = self.node();
        if let Some((&last, rest)) = node.downstream.split_last() {
            for &target in rest {
                self.deliver(target, value.clone()).await;
            }
            self.deliver(last, value).await;
        }
        node.telemetry.record_sent();
    }

    async fn deliver(&self, target: NodeId, value: Message) {
        let downstream = &self.topology.nodes[target];
        let started = Instant::now();

        downstream.queue.push(value).await;
        downstream.telemetry.record_received();

        let elapsed = started.elapsed();
        if let Some(threshold) = self.topology.settings.slow_threshold {
            if elapsed > threshold {
                let from = self.key().to_string();
                let to = downstream.key.to_string();
                self.logger().warn(
                    self,
                    format_args!(
                        "{}",
                        BackpressureDetected {
                            from: &from,
                            to: &to,
                            elapsed,
                        }
                    ),
                );
            }
        }
    }
}

impl fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("key", self.key())
            .field("parallels", &self.parallels())
            .finish()
    }
}
