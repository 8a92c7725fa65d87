// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::next_message;
use crate::engine::NodeContext;
use crate::traits::Operator;

/// Sink that drains its queue and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackholeSink;

#[async_trait]
impl Operator for BlackholeSink {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        while next_message(&cancel, &ctx).await.is_some() {}
        Ok(())
    }
}
