// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-node throughput accounting.
//!
//! Every node carries two cumulative counters (messages received into its
//! queue, `collect` calls completed) and a fixed-capacity ring of per-period
//! deltas. A sampler task ticks once per period, diffs the counters against
//! the previous tick and records both deltas at the ring cursor. Once the
//! cursor wraps, the ring always holds the most recent `capacity` samples.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed-capacity ring of (received, sent) deltas.
#[derive(Debug, Clone)]
pub struct QpsWindow {
    received: Vec<u64>,
    sent: Vec<u64>,
    cursor: usize,
    overflowed: bool,
}

impl QpsWindow {
    /// Create an empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            received: vec![0; capacity],
            sent: vec![0; capacity],
            cursor: 0,
            overflowed: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.received.len()
    }

    /// Number of valid samples.
    pub fn len(&self) -> usize {
        if self.overflowed {
            self.capacity()
        } else {
            self.cursor
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write one sample at the cursor, overwriting the oldest once full.
    pub fn record(&mut self, received: u64, sent: u64) {
        self.received[self.cursor] = received;
        self.sent[self.cursor] = sent;
        self.cursor += 1;
        if self.cursor == self.capacity() {
            self.cursor = 0;
            self.overflowed = true;
        }
    }

    /// Copy out the valid samples, oldest first.
    pub fn samples(&self) -> QpsSamples {
        if self.overflowed {
            QpsSamples {
                received: rotate(&self.received, self.cursor),
                sent: rotate(&self.sent, self.cursor),
            }
        } else {
            QpsSamples {
                received: self.received[..self.cursor].to_vec(),
                sent: self.sent[..self.cursor].to_vec(),
            }
        }
    }
}

fn rotate(ring: &[u64], cursor: usize) -> Vec<u64> {
    ring[cursor..].iter().chain(&ring[..cursor]).copied().collect()
}

/// Copies of the valid portion of a node's throughput window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QpsSamples {
    pub received: Vec<u64>,
    pub sent: Vec<u64>,
}

impl QpsSamples {
    pub fn len(&self) -> usize {
        self.received.len()
    }

    pub fn is_empty(&self) -> bool {
        self.received.is_empty()
    }

    pub fn total_received(&self) -> u64 {
        self.received.iter().sum()
    }

    pub fn total_sent(&self) -> u64 {
        self.sent.iter().sum()
    }

    /// Mean received per sample; `0.0` before the first sample.
    pub fn mean_received(&self) -> f64 {
        mean(self.total_received(), self.len())
    }

    /// Mean sent per sample; `0.0` before the first sample.
    pub fn mean_sent(&self) -> f64 {
        mean(self.total_sent(), self.len())
    }
}

fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Counters and throughput window of one runtime node.
#[derive(Debug)]
pub struct Telemetry {
    received: AtomicU64,
    sent: AtomicU64,
    window: Mutex<QpsWindow>,
}

impl Telemetry {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            received: AtomicU64::new(0),
            sent: AtomicU64::new(0),
            window: Mutex::new(QpsWindow::new(window_capacity)),
        }
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Current window contents, oldest first.
    pub fn qps(&self) -> QpsSamples {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .samples()
    }

    /// Take one sample: record the counter deltas since `last` and advance it.
    pub fn sample(&self, last: &mut (u64, u64)) {
        let received = self.received();
        let sent = self.sent();
        let delta = (received.saturating_sub(last.0), sent.saturating_sub(last.1));
        *last = (received, sent);

        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(delta.0, delta.1);
    }

    /// Sample once per `period` until `scope` is cancelled.
    ///
    /// The first sample is taken one full period after the call.
    pub async fn sample_until_cancelled(&self, scope: CancellationToken, period: Duration) {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        let mut last = (0, 0);
        loop {
            tokio::select! {
                _ = scope.cancelled() => break,
                _ = ticker.tick() => self.sample(&mut last),
            }
        }
    }
}
