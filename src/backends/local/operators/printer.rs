// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::next_message;
use crate::engine::NodeContext;
use crate::traits::Operator;

/// Sink printing each message to stdout as JSON, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrinterSink;

#[async_trait]
impl Operator for PrinterSink {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        while let Some(value) = next_message(&cancel, &ctx).await {
            println!("{}", value);
        }
        Ok(())
    }
}
