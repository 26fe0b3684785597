use crate::PipeError;

/// Capacity of a pipe built with [`PipeConfig::default`].
pub const DEFAULT_CAPACITY: usize = 512;

/// Configuration for a pipe's shared ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeConfig {
    /// Number of slots in the ring. One slot stays empty, so at most
    /// `capacity - 1` bytes can be buffered at once.
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl PipeConfig {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Returns the number of bytes the ring can hold before a writer blocks.
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    /// Sets the ring capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Turns metrics collection on or off.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Checks that the ring has room for at least one byte.
    pub fn validate(&self) -> Result<(), PipeError> {
        if self.capacity < 2 {
            return Err(PipeError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (64 slots, writer blocks early)
pub const LOW_LATENCY_CONFIG: PipeConfig = PipeConfig::new(64, false);

/// High throughput configuration (64K slots)
pub const HIGH_THROUGHPUT_CONFIG: PipeConfig = PipeConfig::new(64 * 1024, false);
