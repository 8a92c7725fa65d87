// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::backends::local::operators::{collect_or_cancel, next_message};
use crate::engine::NodeContext;
use crate::traits::{Message, NodeLogger, Operator, OperatorFactory};

/// A factory handing out one prebuilt instance and counting invocations
pub struct StubFactory {
    name: String,
    instance: Arc<dyn Operator>,
    calls: Arc<AtomicUsize>,
}

impl StubFactory {
    pub fn new(name: impl Into<String>, instance: Arc<dyn Operator>) -> Self {
        Self {
            name: name.into(),
            instance,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter, readable after the factory moved into a registry
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl OperatorFactory for StubFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(
        &self,
        _instance_name: &str,
        _config: &serde_yaml::Value,
    ) -> anyhow::Result<Arc<dyn Operator>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instance.clone())
    }
}

/// A source emitting a fixed list of messages, then idling until cancelled
pub struct ScriptedSource {
    pub values: Vec<Message>,
}

impl ScriptedSource {
    pub fn new(values: Vec<Message>) -> Self {
        Self { values }
    }
}

#[async_trait]
impl Operator for ScriptedSource {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        for value in &self.values {
            if !collect_or_cancel(&cancel, &ctx, value.clone()).await {
                return Ok(());
            }
        }
        cancel.cancelled().await;
        Ok(())
    }
}

/// A sink recording every message it receives, optionally one per gate permit
#[derive(Clone, Default)]
pub struct RecordingSink {
    seen: Arc<Mutex<Vec<Message>>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reads only after acquiring a permit from `gate`
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            seen: Arc::default(),
            gate: Some(gate),
        }
    }

    pub fn values(&self) -> Vec<Message> {
        self.seen.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Operator for RecordingSink {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        loop {
            if let Some(gate) = &self.gate {
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(()),
                    permit = gate.acquire() => permit?.forget(),
                }
            }
            match next_message(&cancel, &ctx).await {
                Some(value) => self.seen.lock().unwrap().push(value),
                None => return Ok(()),
            }
        }
    }
}

/// An operator that waits for cancellation and does nothing else
pub struct IdleOperator;

#[async_trait]
impl Operator for IdleOperator {
    async fn run(&self, cancel: CancellationToken, _ctx: NodeContext) -> anyhow::Result<()> {
        cancel.cancelled().await;
        Ok(())
    }
}

/// An operator whose workers fail immediately for testing failure isolation
pub struct FailingOperator;

#[async_trait]
impl Operator for FailingOperator {
    async fn run(&self, _cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        anyhow::bail!("{} refuses to run", ctx.name())
    }
}

/// One record kept by [`CapturingLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: &'static str,
    pub node: String,
    pub text: String,
}

/// A node logger keeping every record in memory
#[derive(Clone, Default)]
pub struct CapturingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records at `level`, in emission order
    pub fn at(&self, level: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .collect()
    }

    /// Number of records at `level` emitted for `node`
    pub fn count(&self, level: &str, node: &str) -> usize {
        self.at(level)
            .iter()
            .filter(|record| record.node == node)
            .count()
    }

    fn push(&self, level: &'static str, node: &NodeContext, text: String) {
        self.records.lock().unwrap().push(LogRecord {
            level,
            node: node.name().to_string(),
            text,
        });
    }
}

impl NodeLogger for CapturingLogger {
    fn module_started(&self, node: &NodeContext) {
        self.push("started", node, String::new());
    }

    fn module_stopped(&self, node: &NodeContext) {
        self.push("stopped", node, String::new());
    }

    fn info(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        self.push("info", node, message.to_string());
    }

    fn warn(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        self.push("warn", node, message.to_string());
    }

    fn error(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        self.push("error", node, message.to_string());
    }

    fn trace(&self, node: &NodeContext, message: fmt::Arguments<'_>) {
        self.push("trace", node, message.to_string());
    }
}

/// Poll `condition` every 10ms until it holds or `timeout` elapses
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Run `future` with a timeout, panicking if it does not finish
pub async fn within<T>(timeout: Duration, future: impl Future<Output = T>) -> T {
    tokio::time::timeout(timeout, future)
        .await
        .expect("future did not complete in time")
}
