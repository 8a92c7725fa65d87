// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Closure-backed operators and factories.
//!
//! Handy for small stateless operators and for tests, where declaring a type
//! per operator is more ceremony than logic.
//!
//! ```rust
//! use std::sync::Arc;
//! use the_dagstream::traits::{FnFactory, FnOperator, Operator};
//!
//! let factory = FnFactory::new("transform/identity", |_name: &str, _config: &serde_yaml::Value| {
//!     Ok(FnOperator::shared(|cancel, ctx| async move {
//!         loop {
//!             tokio::select! {
//!                 _ = cancel.cancelled() => return Ok(()),
//!                 msg = ctx.message_queue().recv() => match msg {
//!                     Some(value) => ctx.collect(value).await,
//!                     None => return Ok(()),
//!                 },
//!             }
//!         }
//!     }))
//! });
//! # let _ = factory;
//! ```

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::engine::NodeContext;
use crate::traits::{Operator, OperatorFactory};

/// Operator whose run logic is a closure returning a future.
pub struct FnOperator<F> {
    run: F,
}

impl<F, Fut> FnOperator<F>
where
    F: Fn(CancellationToken, NodeContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    pub fn new(run: F) -> Self {
        Self { run }
    }

    /// Wrap the closure straight into the shared handle factories return.
    pub fn shared(run: F) -> Arc<dyn Operator> {
        Arc::new(Self::new(run))
    }
}

#[async_trait]
impl<F, Fut> Operator for FnOperator<F>
where
    F: Fn(CancellationToken, NodeContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        (self.run)(cancel, ctx).await
    }
}

/// Factory whose construction logic is a closure.
pub struct FnFactory<F> {
    name: String,
    create: F,
}

impl<F> FnFactory<F>
where
    F: Fn(&str, &serde_yaml::Value) -> anyhow::Result<Arc<dyn Operator>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, create: F) -> Self {
        Self {
            name: name.into(),
            create,
        }
    }
}

impl<F> OperatorFactory for FnFactory<F>
where
    F: Fn(&str, &serde_yaml::Value) -> anyhow::Result<Arc<dyn Operator>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(
        &self,
        instance_name: &str,
        config: &serde_yaml::Value,
    ) -> anyhow::Result<Arc<dyn Operator>> {
        (self.create)(instance_name, config)
    }
}
