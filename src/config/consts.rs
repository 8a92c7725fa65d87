use std::time::Duration;

/// Default number of one-second throughput samples kept per node
pub const DEFAULT_QPS_WINDOW_CAPACITY: usize = 32;
/// Interval between two telemetry samples
pub const QPS_SAMPLE_PERIOD: Duration = Duration::from_secs(1);
/// Input queue capacity used when a node omits `queueSize`
pub const DEFAULT_QUEUE_SIZE: usize = 1;
/// Worker count used when a node omits `parallels`
pub const DEFAULT_PARALLELS: usize = 1;
