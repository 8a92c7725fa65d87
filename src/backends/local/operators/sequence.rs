// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::collect_or_cancel;
use crate::config::decode_operator_config;
use crate::engine::NodeContext;
use crate::traits::{Message, Operator};

/// Settings of a `source/sequence` node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceConfig {
    /// First value emitted
    #[serde(default)]
    pub start: i64,
    /// Number of values emitted
    pub step: u64,
    /// Emit a trailing `null` once the sequence is exhausted
    #[serde(default)]
    pub end_marker: bool,
}

/// Source emitting the integers `start..start + step`, then idling until cancelled.
///
/// Every worker emits the whole sequence, so a node with `parallels: 2`
/// produces each value twice.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    config: SequenceConfig,
}

impl SequenceSource {
    pub fn new(config: SequenceConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &serde_yaml::Value) -> anyhow::Result<Self> {
        let config: SequenceConfig = decode_operator_config(config)
            .map_err(|e| anyhow::anyhow!("invalid source/sequence configuration: {}", e))?;
        Ok(Self::new(config))
    }

    fn values(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.config.step).map_while(move |offset| {
            i64::try_from(offset)
                .ok()
                .and_then(|offset| self.config.start.checked_add(offset))
        })
    }
}

#[async_trait]
impl Operator for SequenceSource {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        for value in self.values() {
            if !collect_or_cancel(&cancel, &ctx, Message::from(value)).await {
                return Ok(());
            }
        }
        if self.config.end_marker && !collect_or_cancel(&cancel, &ctx, Message::Null).await {
            return Ok(());
        }

        ctx.logger().trace(
            &ctx,
            format_args!("sequence of {} values exhausted", self.config.step),
        );
        cancel.cancelled().await;
        Ok(())
    }
}
