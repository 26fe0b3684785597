//! Read side of a pipe.

use crate::buffer::{Fill, SharedRingBuffer};
use crate::{PipeConfig, PipeError, PipeMetrics, PipeSink};
use std::io;
use std::sync::Arc;
use tracing::debug;

/// The reading endpoint of a pipe.
///
/// A source is created unconnected (or already paired through
/// [`pipe`](crate::pipe)) and must be bound to exactly one [`PipeSink`]
/// before any bytes flow. The source decides the ring's capacity.
///
/// Dropping a source closes the pipe, so a writer blocked on a full ring
/// fails with [`PipeError::Closed`] instead of waiting forever.
#[derive(Debug)]
pub struct PipeSource {
    config: PipeConfig,
    buffer: Option<Arc<SharedRingBuffer>>,
}

impl PipeSource {
    /// Creates an unconnected source with the default 512-slot ring.
    pub fn new() -> Self {
        Self {
            config: PipeConfig::default(),
            buffer: None,
        }
    }

    /// Creates an unconnected source that will build its ring from `config`.
    pub fn with_config(config: PipeConfig) -> Result<Self, PipeError> {
        config.validate()?;
        Ok(Self {
            config,
            buffer: None,
        })
    }

    pub(crate) fn from_buffer(config: PipeConfig, buffer: Arc<SharedRingBuffer>) -> Self {
        Self {
            config,
            buffer: Some(buffer),
        }
    }

    /// Binds this source and `sink` to a fresh shared ring.
    ///
    /// Fails with [`PipeError::AlreadyConnected`] if either endpoint already
    /// has a peer; neither endpoint is modified in that case.
    pub fn connect(&mut self, sink: &mut PipeSink) -> Result<(), PipeError> {
        if self.buffer.is_some() || sink.is_connected() {
            return Err(PipeError::AlreadyConnected);
        }

        let buffer = Arc::new(SharedRingBuffer::new(self.config));
        sink.bind(Arc::clone(&buffer));
        self.buffer = Some(buffer);

        debug!(capacity = self.config.capacity, "pipe connected");
        Ok(())
    }

    fn buffer(&self) -> Result<&SharedRingBuffer, PipeError> {
        self.buffer.as_deref().ok_or(PipeError::NotConnected)
    }

    /// Reads one byte, blocking until one is written or the sink finishes.
    ///
    /// Returns `Ok(None)` at end-of-stream.
    pub fn read_byte(&self) -> Result<Option<u8>, PipeError> {
        self.buffer()?.take()
    }

    /// Fills `buf` as far as the stream allows.
    ///
    /// Blocks until `buf.len()` bytes have been read or end-of-stream is
    /// reached. A count shorter than `buf.len()` therefore always means
    /// end-of-stream. Returns `Ok(None)` when end-of-stream was reached
    /// before a single byte arrived.
    pub fn read_bytes(&self, buf: &mut [u8]) -> Result<Option<usize>, PipeError> {
        self.buffer()?.take_into(buf, Fill::Exact)
    }

    /// Number of bytes that can be read without blocking.
    ///
    /// Zero once the pipe is closed or while the source is unconnected.
    pub fn available(&self) -> usize {
        self.buffer.as_deref().map_or(0, SharedRingBuffer::available)
    }

    /// Closes the pipe. Buffered bytes are discarded, later reads fail with
    /// [`PipeError::StreamClosed`] and later writes with [`PipeError::Closed`].
    pub fn close(&self) {
        if let Some(buffer) = self.buffer.as_deref() {
            buffer.mark_closed();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.buffer.as_deref().is_some_and(SharedRingBuffer::is_closed)
    }

    /// Returns the number of slots in the ring (one more than can be buffered).
    pub fn capacity(&self) -> usize {
        self.buffer
            .as_deref()
            .map_or(self.config.capacity, SharedRingBuffer::capacity)
    }

    /// Returns a snapshot of the pipe's counters.
    pub fn metrics(&self) -> PipeMetrics {
        self.buffer
            .as_deref()
            .map_or_else(PipeMetrics::new, SharedRingBuffer::metrics)
    }

    /// Returns `true` if this source and `sink` are bound to the same ring.
    pub fn shares_buffer_with(&self, sink: &PipeSink) -> bool {
        match (self.buffer.as_ref(), sink.shared_buffer()) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for PipeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PipeSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Returns `Ok(0)` at end-of-stream. Unlike [`PipeSource::read_bytes`], a
/// read returns as soon as at least one byte is available.
impl io::Read for PipeSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

impl io::Read for &PipeSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.buffer()?.take_into(buf, Fill::Available)?.unwrap_or(0))
    }
}
