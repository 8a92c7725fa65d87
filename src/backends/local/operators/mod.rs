// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod blackhole;
pub mod cronjob;
pub mod interval;
pub mod multiply;
pub mod printer;
pub mod sequence;

pub use blackhole::BlackholeSink;
pub use cronjob::{CronJob, CronjobTimer};
pub use interval::IntervalTimer;
pub use multiply::MultiplyTransform;
pub use printer::PrinterSink;
pub use sequence::SequenceSource;

use tokio_util::sync::CancellationToken;

use crate::engine::NodeContext;
use crate::traits::Message;

/// Next message from the node's queue, or `None` once `cancel` fires.
pub(crate) async fn next_message(cancel: &CancellationToken, ctx: &NodeContext) -> Option<Message> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        message = ctx.message_queue().recv() => message,
    }
}

/// Broadcast `value` unless `cancel` fires first. Returns `false` when cancelled.
pub(crate) async fn collect_or_cancel(
    cancel: &CancellationToken,
    ctx: &NodeContext,
    value: Message,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = ctx.collect(value) => true,
    }
}
