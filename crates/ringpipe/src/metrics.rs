/// Optional counters for monitoring pipe traffic.
///
/// Collected only when [`PipeConfig::enable_metrics`](crate::PipeConfig) is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipeMetrics {
    pub bytes_written: u64,
    pub bytes_read: u64,
    /// Times a writer parked on a full ring.
    pub writer_waits: u64,
    /// Times a reader parked on an empty ring.
    pub reader_waits: u64,
}

impl PipeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written but not yet read.
    pub fn in_flight(&self) -> u64 {
        self.bytes_written.saturating_sub(self.bytes_read)
    }
}
