// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{collect_or_cancel, next_message};
use crate::config::decode_operator_config;
use crate::engine::NodeContext;
use crate::traits::{Message, Operator};

#[derive(Debug, Deserialize)]
struct MultiplyConfig {
    factor: f64,
}

/// Transform multiplying each numeric message by a constant factor.
///
/// Integer inputs stay integers when the factor is integral and the product
/// fits in an `i64`. `null` messages pass through unchanged so end-of-stream
/// markers reach the next stage. Any other payload is dropped with a warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplyTransform {
    factor: f64,
}

impl MultiplyTransform {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn from_config(config: &serde_yaml::Value) -> anyhow::Result<Self> {
        let config: MultiplyConfig = decode_operator_config(config)
            .map_err(|e| anyhow::anyhow!("invalid transform/multiply configuration: {}", e))?;
        Ok(Self::new(config.factor))
    }

    /// Product of `value` and the factor, or `None` for non-numeric payloads.
    pub fn apply(&self, value: &Message) -> Option<Message> {
        match value {
            Message::Null => Some(Message::Null),
            Message::Number(number) => {
                if let Some(int) = number.as_i64() {
                    if self.factor.fract() == 0.0
                        && self.factor >= i64::MIN as f64
                        && self.factor <= i64::MAX as f64
                    {
                        if let Some(product) = int.checked_mul(self.factor as i64) {
                            return Some(Message::from(product));
                        }
                    }
                }
                number
                    .as_f64()
                    .map(|float| Message::from(float * self.factor))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Operator for MultiplyTransform {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        while let Some(value) = next_message(&cancel, &ctx).await {
            match self.apply(&value) {
                Some(product) => {
                    if !collect_or_cancel(&cancel, &ctx, product).await {
                        break;
                    }
                }
                None => ctx
                    .logger()
                    .warn(&ctx, format_args!("dropping non-numeric message {}", value)),
            }
        }
        Ok(())
    }
}
