// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::consts::DEFAULT_QPS_WINDOW_CAPACITY;
use crate::traits::{NodeLogger, TracingLogger};

/// Engine-wide runtime knobs.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use the_dagstream::config::EngineOptions;
///
/// let options = EngineOptions::default()
///     .with_slow_threshold_ms(250)
///     .with_qps_window_capacity(8);
///
/// assert_eq!(options.slow_threshold, Some(Duration::from_millis(250)));
/// assert_eq!(options.qps_window_capacity, 8);
/// ```
#[derive(Clone)]
pub struct EngineOptions {
    /// Deliveries slower than this are logged as backpressure. `None` disables the check.
    pub slow_threshold: Option<Duration>,
    /// Number of one-second throughput samples kept per node.
    pub qps_window_capacity: usize,
    /// Logger handed to every node context.
    pub logger: Arc<dyn NodeLogger>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            slow_threshold: None,
            qps_window_capacity: DEFAULT_QPS_WINDOW_CAPACITY,
            logger: Arc::new(TracingLogger),
        }
    }
}

impl EngineOptions {
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    pub fn with_slow_threshold_ms(self, millis: u64) -> Self {
        self.with_slow_threshold(Duration::from_millis(millis))
    }

    /// Set the window capacity; zero is clamped to one.
    pub fn with_qps_window_capacity(mut self, capacity: usize) -> Self {
        self.qps_window_capacity = capacity.max(1);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn NodeLogger>) -> Self {
        self.logger = logger;
        self
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("slow_threshold", &self.slow_threshold)
            .field("qps_window_capacity", &self.qps_window_capacity)
            .finish_non_exhaustive()
    }
}
