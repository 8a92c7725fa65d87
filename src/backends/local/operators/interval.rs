// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::collect_or_cancel;
use crate::config::decode_operator_config;
use crate::engine::NodeContext;
use crate::traits::{Message, Operator};

#[derive(Debug, Deserialize)]
struct IntervalConfig {
    /// Milliseconds between two ticks
    interval: u64,
}

/// Source emitting `null` once per interval until cancelled.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(config: &serde_yaml::Value) -> anyhow::Result<Self> {
        let config: IntervalConfig = decode_operator_config(config)
            .map_err(|e| anyhow::anyhow!("invalid timer/interval configuration: {}", e))?;
        if config.interval == 0 {
            anyhow::bail!("invalid timer/interval configuration: interval must be at least 1ms");
        }
        Ok(Self::new(Duration::from_millis(config.interval)))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl Operator for IntervalTimer {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {
                    if !collect_or_cancel(&cancel, &ctx, Message::Null).await {
                        return Ok(());
                    }
                }
            }
        }
    }
}
